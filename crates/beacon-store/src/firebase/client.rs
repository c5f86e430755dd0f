//! Realtime Database REST client

use async_trait::async_trait;
use beacon_common::{AssertionSigner, FirebaseConfig};
use beacon_core::{MirrorPath, MirrorResult, StatusMirror, StatusPayload};
use reqwest::{Client, StatusCode};

use super::token::TokenCache;
use crate::error::{FirebaseError, FirebaseResult};

/// Writes device status nodes to the Realtime Database
pub struct FirebaseMirror {
    client: Client,
    base_url: String,
    tokens: TokenCache,
}

impl FirebaseMirror {
    /// Create a mirror from configuration
    ///
    /// Fails if the service-account key cannot be parsed or the HTTP client
    /// cannot be built.
    pub fn new(config: &FirebaseConfig) -> FirebaseResult<Self> {
        let signer = AssertionSigner::new(&config.credential)?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(FirebaseError::Client)?;

        Ok(Self::with_client(client, &config.database_url, signer))
    }

    /// Create a mirror around an existing HTTP client
    #[must_use]
    pub fn with_client(client: Client, database_url: &str, signer: AssertionSigner) -> Self {
        Self {
            tokens: TokenCache::new(client.clone(), signer),
            client,
            base_url: database_url.trim_end_matches('/').to_string(),
        }
    }

    /// REST URL of a node. `print=silent` makes the database answer 204 with no body.
    fn node_url(&self, path: &MirrorPath) -> String {
        format!("{}/{}.json?print=silent", self.base_url, path)
    }

    async fn put(&self, path: &MirrorPath, payload: &StatusPayload) -> FirebaseResult<()> {
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .put(self.node_url(path))
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .map_err(|source| FirebaseError::Request {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(path = %path, status = %payload.status, "Mirrored status");
            return Ok(());
        }

        if status == StatusCode::UNAUTHORIZED {
            self.tokens.invalidate().await;
        }

        let body = response.text().await.unwrap_or_default();
        Err(FirebaseError::Rejected {
            path: path.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl StatusMirror for FirebaseMirror {
    async fn set(&self, path: &MirrorPath, payload: &StatusPayload) -> MirrorResult<()> {
        self.put(path, payload).await.map_err(Into::into)
    }
}

impl std::fmt::Debug for FirebaseMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseMirror")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
