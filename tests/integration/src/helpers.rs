//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use beacon_api::{create_app, AppState};
use beacon_common::AppConfig;
use beacon_store::MemoryMirror;
use beacon_tracker::PresenceTracker;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub tracker: PresenceTracker,
    mirror: Option<Arc<MemoryMirror>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a test server with default settings
    pub async fn start() -> Result<Self> {
        Self::start_with(&[]).await
    }

    /// Start a test server with extra environment settings
    pub async fn start_with(vars: &[(&str, &str)]) -> Result<Self> {
        let config = test_config(vars)?;
        let mirror = Arc::new(MemoryMirror::new());
        let tracker = PresenceTracker::new(mirror.clone(), &config.tracker);

        let mut server = Self::serve(AppState::new(tracker, config)).await?;
        server.mirror = Some(mirror);
        Ok(server)
    }

    /// Serve an already assembled state
    pub async fn serve(state: AppState) -> Result<Self> {
        let tracker = state.tracker().clone();
        let app = create_app(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            tracker,
            mirror: None,
            handle,
        })
    }

    /// The in-memory mirror of a server started with [`start`](Self::start)
    pub fn mirror(&self) -> &MemoryMirror {
        self.mirror
            .as_deref()
            .expect("server was started without an in-memory mirror")
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request with a raw body and no content type
    pub async fn post_raw(&self, path: &str, body: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).body(body.to_string()).send().await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.tracker.shutdown();
        self.handle.abort();
    }
}

/// Base64 service-account credential; `private_key` is not checked here
pub fn test_credential(private_key: &str, token_uri: &str) -> String {
    let account = serde_json::json!({
        "type": "service_account",
        "project_id": "beacon-test",
        "private_key_id": "key-1",
        "private_key": private_key,
        "client_email": "relay@beacon-test.iam.gserviceaccount.com",
        "token_uri": token_uri,
    });
    STANDARD.encode(account.to_string())
}

/// Create a test configuration; `vars` override the defaults
pub fn test_config(vars: &[(&str, &str)]) -> Result<AppConfig> {
    let mut env: HashMap<String, String> = HashMap::from([
        (
            "FIREBASE_CONFIG_BASE64".to_string(),
            test_credential("unused", "http://127.0.0.1:9/token"),
        ),
        ("FIREBASE_DB_URL".to_string(), "http://127.0.0.1:9".to_string()),
        ("RATE_LIMIT_REQUESTS_PER_SECOND".to_string(), "1000".to_string()),
        ("RATE_LIMIT_BURST".to_string(), "1000".to_string()),
    ]);
    env.extend(vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())));

    AppConfig::from_lookup(|name| env.get(name).cloned())
        .map_err(|e| anyhow::anyhow!("Config error: {}", e))
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Wait for `count` mirror writes, failing after five seconds
pub async fn wait_for_writes(mirror: &MemoryMirror, count: usize) -> Result<()> {
    tokio::time::timeout(Duration::from_secs(5), mirror.wait_for_writes(count))
        .await
        .map_err(|_| anyhow::anyhow!("Timed out waiting for {count} mirror writes"))
}
