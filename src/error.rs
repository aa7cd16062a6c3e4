//! Nerview error types

use std::time::Duration;

/// Nerview error types
#[derive(Debug, thiserror::Error)]
pub enum NerviewError {
    // Network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("endpoint not found: {0}")]
    EndpointNotFound(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("request cancelled")]
    Cancelled,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response parsed as JSON but carries no `body.output` field.
    #[error("response is missing the output field")]
    MissingOutput,

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl NerviewError {
    /// Whether this error came out of the network call itself rather than
    /// from local configuration. Transport errors are the ones a user can
    /// plausibly fix by retrying.
    pub fn is_transport(&self) -> bool {
        !matches!(self, NerviewError::Configuration(_))
    }

    /// Server-provided retry hint, when the error carries one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            NerviewError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Result type alias for nerview operations
pub type Result<T> = std::result::Result<T, NerviewError>;
