//! Error types for the DWH API client
//!
//! All fallible operations in this crate return [`ApiError`]. The enum keeps
//! the failing phase visible: submit problems (`EmptyResponse`, transport
//! variants), poll problems (`TaskFailed`), post-condition problems
//! (`InvalidState`) and caller timeouts (`PollTimeout`) are distinct
//! variants, so callers can tell which stage of an asynchronous operation
//! went wrong.
//!
//! The type is `Clone`: a resolved [`FutureResult`](crate::FutureResult)
//! replays its terminal outcome on every subsequent call, so the stored
//! failure must be cloneable. Transport errors are rendered to strings at
//! the conversion boundary for the same reason.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Error type for all DWH API operations
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// Request was malformed or rejected by validation (400)
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// API token was missing or rejected (401)
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Authenticated but not allowed (403)
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Resource does not exist (404)
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Too many requests (429)
    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    /// Server-side failure (5xx)
    #[error("Server error: {message}")]
    ServerError { message: String },

    /// Any other non-success status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// Could not reach the API at all
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A single request exceeded the client timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Response body could not be deserialized
    #[error("Invalid response body: {0}")]
    InvalidResponse(String),

    /// A submit call returned no body where a task envelope was required
    #[error("Empty response from API: {0}")]
    EmptyResponse(String),

    /// An asynchronous task reached a terminal failure while polling
    #[error("Task failed: {0}")]
    TaskFailed(String),

    /// The operation finished but left the resource in an unusable state
    #[error("Invalid resource state: {0}")]
    InvalidState(String),

    /// A `get_within` deadline elapsed before the task resolved
    #[error("Polling timed out after {0:?}")]
    PollTimeout(Duration),
}

/// Result type alias for DWH API operations
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Map an HTTP status and extracted message to the matching variant.
    pub(crate) fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST => ApiError::BadRequest { message },
            StatusCode::UNAUTHORIZED => ApiError::AuthenticationFailed { message },
            StatusCode::FORBIDDEN => ApiError::Forbidden { message },
            StatusCode::NOT_FOUND => ApiError::NotFound { message },
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited { message },
            s if s.is_server_error() => ApiError::ServerError { message },
            s => ApiError::UnexpectedStatus {
                status: s.as_u16(),
                message,
            },
        }
    }

    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::AuthenticationFailed { .. } | ApiError::Forbidden { .. }
        )
    }

    /// Returns true if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::ServerError { .. })
    }

    /// Returns true if this is a timeout, either per-request or while polling
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout(_) | ApiError::PollTimeout(_))
    }

    /// Returns true if this is a rate limiting error (429)
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }

    /// Returns true if this is a bad request error (400)
    #[must_use]
    pub fn is_bad_request(&self) -> bool {
        matches!(self, ApiError::BadRequest { .. })
    }

    /// Returns true if this error is potentially retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.is_rate_limited()
            || self.is_server_error()
            || self.is_timeout()
            || matches!(self, ApiError::ConnectionError(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else {
            ApiError::ConnectionError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidResponse(err.to_string())
    }
}
