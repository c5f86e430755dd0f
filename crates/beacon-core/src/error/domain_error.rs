//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Missing required fields")]
    MissingFields,

    #[error("Missing required field: user_id")]
    MissingOwner,

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid {field}: {value:?} cannot be used as a storage key")]
    InvalidKey { field: &'static str, value: String },

    #[error("Invalid {field}: {len} bytes exceeds the {max}-byte key limit")]
    KeyTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Invalid {field}: {value} is outside [{min}, {max}]")]
    CoordinateOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    /// The external store was unreachable or rejected the write. The message
    /// is reported to callers as-is.
    #[error("{0}")]
    UpstreamWrite(String),
}

impl DomainError {
    /// Get an error code string for API responses and logs
    pub fn code(&self) -> &'static str {
        match self {
            // Validation
            Self::MissingFields => "MISSING_FIELDS",
            Self::MissingOwner => "MISSING_OWNER",
            Self::InvalidStatus(_) => "INVALID_STATUS",
            Self::InvalidKey { .. } => "INVALID_KEY",
            Self::KeyTooLong { .. } => "KEY_TOO_LONG",
            Self::CoordinateOutOfRange { .. } => "COORDINATE_OUT_OF_RANGE",

            // Infrastructure
            Self::UpstreamWrite(_) => "UPSTREAM_WRITE_ERROR",
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingFields
                | Self::MissingOwner
                | Self::InvalidStatus(_)
                | Self::InvalidKey { .. }
                | Self::KeyTooLong { .. }
                | Self::CoordinateOutOfRange { .. }
        )
    }

    /// Check if this error came from the external store
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamWrite(_))
    }
}
