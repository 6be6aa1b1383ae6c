use crate::{error::ApiError, AppState};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// GET /:code
///
/// Look the short code up in the store and answer with a 302 redirect to the
/// original URL, or a 404 when the code was never issued.
pub async fn redirect(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Response, ApiError> {
    match state.store.get(&code) {
        Some(original_url) => {
            tracing::debug!("Resolved '{}' -> {}", code, original_url);
            // axum's Redirect only offers 303/307/308; build the 302 by hand.
            Ok((StatusCode::FOUND, [(header::LOCATION, original_url)]).into_response())
        }
        None => {
            tracing::debug!("Unknown short code '{}'", code);
            Err(ApiError::NotFound)
        }
    }
}
