//! Store error types

use beacon_common::CredentialError;
use beacon_core::DomainError;

/// Errors raised while talking to the realtime database
#[derive(Debug, thiserror::Error)]
pub enum FirebaseError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("Failed to sign token assertion: {0}")]
    Signing(String),

    #[error("Token request failed: {0}")]
    TokenRequest(#[source] reqwest::Error),

    #[error("Token endpoint rejected the assertion: HTTP {status}: {body}")]
    TokenRejected { status: u16, body: String },

    #[error("Write to {path} failed: {source}")]
    Request {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Write to {path} rejected: HTTP {status}: {body}")]
    Rejected {
        path: String,
        status: u16,
        body: String,
    },
}

/// Result type for Firebase operations
pub type FirebaseResult<T> = Result<T, FirebaseError>;

impl From<FirebaseError> for DomainError {
    fn from(err: FirebaseError) -> Self {
        DomainError::UpstreamWrite(err.to_string())
    }
}
