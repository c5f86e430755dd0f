//! OAuth2 JWT-bearer assertions
//!
//! A service account proves its identity to Google's token endpoint with a
//! short-lived RS256 JWT signed by its private key. The endpoint answers with
//! an access token usable against the Realtime Database REST API.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use super::service_account::{CredentialError, ServiceAccount};
use crate::error::AppError;

/// Scopes needed to write to the Realtime Database
pub const FIREBASE_SCOPES: &str =
    "https://www.googleapis.com/auth/firebase.database https://www.googleapis.com/auth/userinfo.email";

/// Maximum assertion lifetime accepted by the token endpoint
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Claims of a JWT-bearer assertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionClaims {
    /// Issuer (service-account email)
    pub iss: String,
    /// Space-separated OAuth scopes
    pub scope: String,
    /// Audience (token endpoint)
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Signs assertions for one service account
#[derive(Clone)]
pub struct AssertionSigner {
    encoding_key: EncodingKey,
    key_id: Option<String>,
    client_email: String,
    token_uri: String,
}

impl AssertionSigner {
    /// Prepare a signer, rejecting accounts whose private key cannot be parsed
    pub fn new(account: &ServiceAccount) -> Result<Self, CredentialError> {
        let encoding_key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())
            .map_err(|e| CredentialError::InvalidKey(e.to_string()))?;

        Ok(Self {
            encoding_key,
            key_id: account.private_key_id.clone(),
            client_email: account.client_email.clone(),
            token_uri: account.token_uri.clone(),
        })
    }

    /// Token endpoint the assertion is addressed to
    #[must_use]
    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    /// Build the claims for an assertion issued at `now`
    #[must_use]
    pub fn claims_at(&self, now: DateTime<Utc>) -> AssertionClaims {
        AssertionClaims {
            iss: self.client_email.clone(),
            scope: FIREBASE_SCOPES.to_string(),
            aud: self.token_uri.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
        }
    }

    /// Sign an assertion issued at `now`
    pub fn sign(&self, now: DateTime<Utc>) -> Result<String, AppError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.key_id);

        encode(&header, &self.claims_at(now), &self.encoding_key)
            .map_err(AppError::internal)
    }
}

impl std::fmt::Debug for AssertionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssertionSigner")
            .field("key_id", &self.key_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}
