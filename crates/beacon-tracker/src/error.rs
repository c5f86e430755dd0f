//! Tracker error types

use beacon_core::DomainError;

/// Tracker error type
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Validation failure or upstream write failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The tracker was shut down and accepts no more events
    #[error("Tracker is shut down")]
    Closed,
}

impl TrackerError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) if e.is_validation() => 400,
            Self::Domain(_) => 500,
            Self::Closed => 503,
        }
    }

    /// Get the error code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Closed => "TRACKER_CLOSED",
        }
    }
}

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;
