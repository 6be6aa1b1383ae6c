use crate::{
    code,
    error::{ApiError, UrlError},
    models::{ShortenRequest, ShortenResponse},
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;
use url::Url;

/// POST /shorten
///
/// 1. Parse the JSON body and validate the URL.
/// 2. Allocate a short code that is not already taken.
/// 3. Store the mapping and return the public short URL.
pub async fn shorten(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, ApiError> {
    // ── 1. Validate input ──────────────────────────────────────────────────
    let Json(req) = body.map_err(|e| {
        tracing::warn!("Rejected shorten request body: {}", e);
        ApiError::InvalidBody
    })?;

    let url = validate_url(&req.url).map_err(|e| {
        tracing::warn!("Rejected URL '{}': {}", req.url, e);
        ApiError::from(e)
    })?;

    // ── 2. Allocate ────────────────────────────────────────────────────────
    let short_code = code::generate_unique(
        &state.store,
        state.config.code_length,
        state.config.max_attempts,
    )
    .map_err(|e| {
        tracing::error!("Short code allocation failed: {}", e);
        ApiError::from(e)
    })?;

    // ── 3. Store ───────────────────────────────────────────────────────────
    state.store.put(&short_code, &url);
    tracing::info!(total = state.store.len(), "Link created: {} -> {}", short_code, url);

    Ok(Json(ShortenResponse {
        short_url: state.config.short_url(&short_code),
    }))
}

/// Accept only absolute http(s) URLs with a host. Returns the trimmed URL
/// exactly as submitted so the redirect target is what the caller sent.
fn validate_url(raw: &str) -> Result<String, UrlError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlError::Empty);
    }

    let parsed = Url::parse(raw)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(UrlError::UnsupportedScheme(parsed.scheme().to_owned()));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(raw.to_owned())
}
