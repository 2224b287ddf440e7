use std::time::Duration;

use thiserror::Error;

/// Transport-level failures produced by the request policy layer
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Rate limited by registry (HTTP 429)")]
    RateLimited,

    #[error("Registry server error: {status} {status_text}")]
    Server { status: u16, status_text: String },

    #[error("Unexpected status: {status} {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Failures surfaced to callers of the dispatcher.
///
/// Not-found and malformed Maven coordinates are not errors: adapters
/// normalize those into a `found: false` [`PackageResult`](crate::types::PackageResult).
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unsupported registry: {0}")]
    UnsupportedRegistry(String),

    #[error(transparent)]
    Request(#[from] RequestError),
}
