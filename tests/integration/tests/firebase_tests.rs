//! End-to-end tests through the Firebase mirror
//!
//! The server is assembled exactly as in production, pointed at a local
//! stand-in for the token endpoint and the Realtime Database REST API.
//!
//! Run with: cargo test -p integration-tests --test firebase_tests

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode as AxumStatus},
    routing::{post, put},
    Json, Router,
};
use beacon_api::create_app_state;
use integration_tests::{
    assert_json, fixtures::*, test_config, test_credential, TestServer,
};
use parking_lot::Mutex;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

const PRIVATE_KEY: &str = include_str!("../../../crates/beacon-common/testdata/test_key.pem");

type Writes = Arc<Mutex<Vec<(String, Option<String>, Value)>>>;

async fn issue_token() -> Json<Value> {
    Json(json!({
        "access_token": "token-1",
        "expires_in": 3600,
        "token_type": "Bearer"
    }))
}

async fn write_node(
    State(writes): State<Writes>,
    Path(path): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> AxumStatus {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    writes.lock().push((path, auth, body));
    AxumStatus::OK
}

async fn start_fake_firebase() -> (SocketAddr, Writes) {
    let writes = Writes::default();
    let app = Router::new()
        .route("/token", post(issue_token))
        .route("/db/*path", put(write_node))
        .with_state(writes.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (addr, writes)
}

async fn server_for(token_uri: &str, db_url: &str) -> TestServer {
    let credential = test_credential(PRIVATE_KEY, token_uri);
    let config = test_config(&[
        ("FIREBASE_CONFIG_BASE64", credential.as_str()),
        ("FIREBASE_DB_URL", db_url),
        ("FIREBASE_TIMEOUT_SECS", "2"),
    ])
    .unwrap();

    let state = create_app_state(config).expect("Failed to build state");
    TestServer::serve(state).await.expect("Failed to start server")
}

#[tokio::test]
async fn test_status_reaches_database() {
    let (addr, writes) = start_fake_firebase().await;
    let server = server_for(&format!("http://{addr}/token"), &format!("http://{addr}/db")).await;

    let request = LocationRequest::start("dev1", "amb1")
        .for_user("u1")
        .at(12.97, 77.59);
    let response = server.post("/location", &request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let writes = writes.lock().clone();
    assert_eq!(writes.len(), 1);
    let (node, auth, body) = &writes[0];
    assert_eq!(node, "locations/amb1/dev1/u1.json");
    assert_eq!(auth.as_deref(), Some("Bearer token-1"));
    assert_eq!(
        body,
        &json!({"status": "start", "latitude": 12.97, "longitude": 77.59})
    );
}

#[tokio::test]
async fn test_unreachable_database_is_reported() {
    // Nothing listens on the discard port
    let server = server_for("http://127.0.0.1:9/token", "http://127.0.0.1:9/db").await;

    let response = server
        .post("/location", &LocationRequest::start("dev1", "amb1"))
        .await
        .unwrap();

    let body: FailureResponse =
        assert_json(response, StatusCode::INTERNAL_SERVER_ERROR).await.unwrap();
    assert_eq!(body.status, "failure");
    assert!(body.error.starts_with("Token request failed"));

    let response = server.get("/queue").await.unwrap();
    let body: QueueResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.queue, vec!["amb1"]);
}

#[test]
fn test_invalid_private_key_fails_at_startup() {
    let credential = test_credential("not a key", "http://127.0.0.1:9/token");
    let config = test_config(&[("FIREBASE_CONFIG_BASE64", credential.as_str())]).unwrap();

    assert!(create_app_state(config).is_err());
}
