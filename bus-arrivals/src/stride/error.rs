//! Schedule source error types.

use super::convert::ConversionError;

/// Errors from querying the schedule source.
///
/// The pipeline never wraps or retries these; they reach the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum StrideError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Requested record does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limited by the API
    #[error("rate limited by schedule API")]
    RateLimited,

    /// A record was missing data the pipeline needs
    #[error("malformed record: {0}")]
    Conversion(#[from] ConversionError),

    /// Fixture data could not be loaded
    #[error("fixture error: {0}")]
    Fixture(String),

    /// Query parameters fall outside the representable time range
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(body) => format!(" (body: {body})"),
        None => String::new(),
    }
}
