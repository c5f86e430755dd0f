//! Google service-account credentials
//!
//! The credential is supplied as a base64-encoded copy of the JSON key file
//! downloaded from the Firebase console.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use std::fmt;

/// Token endpoint used when the key file does not name one
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Credential decoding errors
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Credential is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Credential is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Credential is not a valid service-account JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Credential private key is unusable: {0}")]
    InvalidKey(String),
}

/// Service-account key file contents
#[derive(Clone, Deserialize)]
pub struct ServiceAccount {
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccount {
    /// Decode a base64-encoded key file
    pub fn from_base64(encoded: &str) -> Result<Self, CredentialError> {
        let bytes = STANDARD.decode(encoded.trim())?;
        let json = String::from_utf8(bytes)?;
        Self::from_json(&json)
    }

    /// Parse a key file
    pub fn from_json(json: &str) -> Result<Self, CredentialError> {
        Ok(serde_json::from_str(json)?)
    }
}

// Keep the private key out of logs.
impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("account_type", &self.account_type)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}
