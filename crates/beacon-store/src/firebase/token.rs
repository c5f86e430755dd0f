//! Access token cache
//!
//! Exchanges signed service-account assertions for OAuth2 access tokens and
//! reuses each token until shortly before it expires.

use beacon_common::AssertionSigner;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::{FirebaseError, FirebaseResult};

/// Grant type for the OAuth2 JWT-bearer flow
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Tokens are replaced this long before they actually expire
const REFRESH_MARGIN_SECS: i64 = 60;

/// An OAuth2 access token and its expiry
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Whether the token can still be used at `now`
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Caches the access token for one service account
pub struct TokenCache {
    client: Client,
    signer: AssertionSigner,
    // Held across the refresh so concurrent writers share one token request.
    cached: Mutex<Option<AccessToken>>,
}

impl TokenCache {
    #[must_use]
    pub fn new(client: Client, signer: AssertionSigner) -> Self {
        Self {
            client,
            signer,
            cached: Mutex::new(None),
        }
    }

    /// Return a usable access token, fetching a new one if needed
    pub async fn access_token(&self) -> FirebaseResult<String> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.token.clone());
        }

        let token = self.fetch(now).await?;
        let value = token.token.clone();
        *cached = Some(token);
        Ok(value)
    }

    /// Drop the cached token so the next call fetches a new one
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    async fn fetch(&self, now: DateTime<Utc>) -> FirebaseResult<AccessToken> {
        let assertion = self
            .signer
            .sign(now)
            .map_err(|e| FirebaseError::Signing(e.to_string()))?;

        let response = self
            .client
            .post(self.signer.token_uri())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(FirebaseError::TokenRequest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FirebaseError::TokenRejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: TokenResponse = response.json().await.map_err(FirebaseError::TokenRequest)?;

        let expires_at =
            expiry_after(now, body.expires_in).ok_or_else(|| FirebaseError::TokenRejected {
                status: status.as_u16(),
                body: format!("unusable expires_in: {}", body.expires_in),
            })?;

        tracing::debug!(expires_in = body.expires_in, "Fetched database access token");

        Ok(AccessToken {
            token: body.access_token,
            expires_at,
        })
    }
}

/// Expiry of a token issued at `now` for `expires_in` seconds, if representable
fn expiry_after(now: DateTime<Utc>, expires_in: i64) -> Option<DateTime<Utc>> {
    Duration::try_seconds(expires_in).and_then(|ttl| now.checked_add_signed(ttl))
}
