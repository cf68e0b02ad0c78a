//! Unified error handling for dwh-core
//!
//! Wraps the API client error with consistent helper methods so callers
//! can classify failures without matching on the underlying enum.

use std::time::Duration;

use thiserror::Error;

/// Core error type for workflows and configuration
#[derive(Error, Debug)]
pub enum CoreError {
    /// Error from the DWH API
    #[error("DWH API error: {0}")]
    Api(#[from] dwh_api::ApiError),

    /// Asynchronous task failed
    #[error("Task failed: {0}")]
    TaskFailed(String),

    /// Asynchronous task did not resolve within the wait deadline
    #[error("Task timed out after {0:?}")]
    TaskTimeout(Duration),

    /// Input validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            CoreError::Api(e) => e.is_not_found(),
            _ => false,
        }
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        match self {
            CoreError::Api(e) => e.is_unauthorized(),
            _ => false,
        }
    }

    /// Returns true if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        match self {
            CoreError::Api(e) => e.is_server_error(),
            _ => false,
        }
    }

    /// Returns true if this is a timeout error
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            CoreError::Api(e) => e.is_timeout(),
            CoreError::TaskTimeout(_) => true,
            _ => false,
        }
    }

    /// Returns true if this error is potentially retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            CoreError::Api(e) => e.is_retryable(),
            // A wait timeout might succeed on a longer retry
            CoreError::TaskTimeout(_) => true,
            _ => false,
        }
    }
}
