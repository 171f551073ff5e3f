//! Error types for the sentiment pipeline

use thiserror::Error;

/// Errors raised by the search, summarization and sentiment stages
#[derive(Debug, Error)]
pub enum PulseError {
    /// A service answered with a non-success status or an error payload
    #[error("{service} API error: {message}")]
    ApiError {
        service: &'static str,
        message: String,
    },

    /// A service answered, but without the fields we need
    #[error("Malformed {service} response: {reason}")]
    MalformedResponse {
        service: &'static str,
        reason: String,
    },

    /// Invalid ticker symbol provided
    #[error("Invalid ticker: {0:?}")]
    InvalidTicker(String),

    /// Nothing to aggregate
    #[error("No news sources to score for {0}")]
    NoSources(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Reading input or writing the report failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PulseError {
    pub(crate) fn api(service: &'static str, message: impl Into<String>) -> Self {
        Self::ApiError {
            service,
            message: message.into(),
        }
    }

    pub(crate) fn malformed(service: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            service,
            reason: reason.into(),
        }
    }
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PulseError>;

impl From<pulse_utils::EnvError> for PulseError {
    fn from(err: pulse_utils::EnvError) -> Self {
        PulseError::ConfigError(err.to_string())
    }
}
