use serde::{Deserialize, Serialize};

/// Body of `POST /shorten`.
#[derive(Debug, Clone, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
}

/// Successful reply to `POST /shorten`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShortenResponse {
    pub short_url: String,
}
