//! Application error types
//!
//! Errors raised while assembling and running the service, plus the failure
//! body every endpoint answers with.

use beacon_core::DomainError;
use serde::Serialize;

/// Value of the `status` field on every failed response
pub const FAILURE: &str = "failure";

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Startup errors: bad settings, unusable credential, unbindable address
    #[error("Configuration error: {0}")]
    Config(String),

    // Internal errors
    #[error("{0}")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) if e.is_validation() => 400,
            Self::Domain(_) | Self::Config(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Error body returned by every endpoint: `{"status": "failure", "error": ...}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: FAILURE,
            error: message.into(),
        }
    }
}
