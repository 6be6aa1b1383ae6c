use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// The random source failed while drawing a short code.
#[derive(Debug, thiserror::Error)]
#[error("random source failure: {0}")]
pub struct GenerationError(#[from] rand::Error);

#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("no free short code after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum UrlError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL must start with http:// or https://, got scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("malformed URL: {0}")]
    Malformed(#[from] url::ParseError),

    #[error("URL has no host")]
    MissingHost,
}

/// Errors surfaced by the HTTP handlers. Each variant maps onto one status
/// code and a JSON `{"error": ...}` body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request body")]
    InvalidBody,

    #[error("Invalid URL")]
    InvalidUrl(#[source] UrlError),

    #[error("Could not generate short code")]
    Allocation(#[from] AllocationError),

    #[error("Short URL not found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody | ApiError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            ApiError::Allocation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<UrlError> for ApiError {
    fn from(err: UrlError) -> Self {
        ApiError::InvalidUrl(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
