//! Anthropic API error types with retry classification.

use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::error::LmError;

/// Errors from the Anthropic Messages API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid request parameters (HTTP 400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid or missing API key (HTTP 401)
    #[error("Invalid API key - authentication failed")]
    InvalidApiKey,

    /// Forbidden - permission denied (HTTP 403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Model or endpoint not found (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded - too many requests")]
    RateLimitExceeded,

    /// Server error (HTTP 500, 502, 503, 504, 529)
    #[error("Server error ({0}): {1}")]
    ServerError(StatusCode, String),

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The completion text lacked required output fields
    #[error("Malformed completion: {0}")]
    MalformedCompletion(String),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Unexpected status
    #[error("Unknown error ({0}): {1}")]
    UnknownError(StatusCode, String),
}

impl ApiError {
    /// Returns true if this error is transient and should be retried
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::RateLimitExceeded | ApiError::ServerError(_, _) | ApiError::Timeout => true,
            // Decode failures surface as reqwest errors too; only retry the wire
            ApiError::NetworkError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }

    /// Returns true if this is a permanent error that should not be retried
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidRequest(_)
                | ApiError::InvalidApiKey
                | ApiError::Forbidden(_)
                | ApiError::NotFound
        )
    }
}

impl From<ApiError> for LmError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Timeout => LmError::Timeout,
            ApiError::NetworkError(e) if e.is_timeout() => LmError::Timeout,
            ApiError::NetworkError(e) if e.is_decode() => LmError::InvalidResponse(e.to_string()),
            ApiError::JsonError(e) => LmError::InvalidResponse(e.to_string()),
            ApiError::MalformedCompletion(reason) => LmError::InvalidResponse(reason),
            other => LmError::Transport(other.to_string()),
        }
    }
}
