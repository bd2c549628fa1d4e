//! Error types
//!
//! Typed errors for the provider boundary, image loading and configuration.
//! None of these ever escape `RequestDispatcher::dispatch`; they are
//! classified into a [`FailureKind`](crate::FailureKind) there.

use thiserror::Error;

/// Error raised by a [`ModelBackend`](crate::ModelBackend) for a single call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The call did not complete within its time budget.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Connection could not be established or was reset.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Provider answered 2xx with a body that could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),

    /// Provider answered but produced no text (blocked or empty candidate).
    #[error("model returned no text")]
    EmptyResponse,

    /// Anything the adapter could not place in another variant.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(err.to_string())
        } else if err.is_connect() || err.is_request() || err.is_body() {
            ProviderError::Connection(err.to_string())
        } else if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ProviderError::Http {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ProviderError::Other(err.to_string())
        }
    }
}

/// Error loading an image attachment from disk.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("unsupported image format '{0}' (allowed: jpg, jpeg, png)")]
    UnsupportedFormat(String),

    #[error("image is {size_mb:.1} MB, limit is {limit_mb} MB")]
    TooLarge { size_mb: f64, limit_mb: u64 },

    #[error("file is not a readable image: {0}")]
    Decode(String),

    #[error("failed to re-encode image: {0}")]
    Encode(String),

    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid or missing gateway configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("model roster is empty")]
    EmptyRoster,

    #[error("invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}
