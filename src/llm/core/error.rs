//! Error types for the LLM layer

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when building or sending a completion request
#[derive(Debug, Error)]
pub enum LlmError {
    /// Malformed prompt, history or configuration, detected before any network call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing, rejected or unresolvable credentials
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded (retry after {retry_after:?})")]
    RateLimitError { retry_after: Option<Duration> },

    /// The provider refused the request as malformed
    #[error("Invalid request: {0}")]
    InvalidRequestError(String),

    /// Connection, DNS or timeout failure before a response was received
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The provider failed or answered with something unreadable
    #[error("Server error (status {status}): {body}")]
    ServerError { status: u16, body: String },
}

impl LlmError {
    /// Classify a non-success HTTP response
    pub fn from_status(status: u16, body: String, retry_after: Option<Duration>) -> Self {
        match status {
            401 | 403 => LlmError::AuthenticationError(body),
            429 => LlmError::RateLimitError { retry_after },
            400..=499 => LlmError::InvalidRequestError(body),
            _ => LlmError::ServerError { status, body },
        }
    }

    /// Whether repeating the same request later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::RateLimitError { .. } | LlmError::NetworkError(_) | LlmError::ServerError { .. }
        )
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::ServerError {
            status: 0,
            body: format!("Malformed response payload: {}", err),
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            LlmError::from_status(status.as_u16(), err.to_string(), None)
        } else if err.is_decode() {
            LlmError::ServerError {
                status: 0,
                body: err.to_string(),
            }
        } else {
            LlmError::NetworkError(err.to_string())
        }
    }
}

/// Failure raised inside an observer hook
///
/// Never reaches the caller of a completion; the orchestrator logs it and moves on.
#[derive(Debug, Error)]
#[error("Observer error: {0}")]
pub struct ObserverError(pub String);

impl ObserverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<std::io::Error> for ObserverError {
    fn from(err: std::io::Error) -> Self {
        ObserverError(err.to_string())
    }
}
