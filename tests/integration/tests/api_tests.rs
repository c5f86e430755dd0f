//! API Integration Tests
//!
//! Each test spawns a server on a local port backed by an in-memory mirror.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use beacon_core::DeviceStatus;
use integration_tests::{
    assert_json, fixtures::*, wait_for_writes, TestServer,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/health").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

// ============================================================================
// Location Tests
// ============================================================================

#[tokio::test]
async fn test_start_echoes_fields() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/location", &LocationRequest::start("dev1", "amb1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The raw body carries both status keys, envelope first
    let text = response.text().await.unwrap();
    assert_eq!(
        text,
        r#"{"status":"success","esp32_id":"dev1","name":"amb1","status":"start"}"#
    );

    let response = server.get("/queue").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body, json!({"status": "success", "queue": ["amb1"]}));

    assert_eq!(
        server.mirror().status_at("locations/amb1/dev1"),
        Some(DeviceStatus::Start)
    );
}

#[tokio::test]
async fn test_missing_name() {
    let server = TestServer::start().await.unwrap();

    let mut request = LocationRequest::start("dev1", "amb1");
    request.name = None;
    let response = server.post("/location", &request).await.unwrap();

    let body: FailureResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(
        body,
        FailureResponse {
            status: "failure".to_string(),
            error: "Missing required fields".to_string(),
        }
    );
    assert!(server.mirror().is_empty());
}

#[tokio::test]
async fn test_invalid_status() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/location", &LocationRequest::new("dev1", "amb1", "pause"))
        .await
        .unwrap();

    let body: FailureResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error, "Invalid status: pause");
}

#[tokio::test]
async fn test_forbidden_key_characters() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/location", &LocationRequest::start("dev1", "amb/1"))
        .await
        .unwrap();

    let body: FailureResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.status, "failure");
    assert!(server.mirror().is_empty());
}

#[tokio::test]
async fn test_key_limit_counts_bytes() {
    let server = TestServer::start().await.unwrap();

    // 500 characters, 1000 bytes
    let name = "ü".repeat(500);
    let response = server
        .post("/location", &LocationRequest::start("dev1", &name))
        .await
        .unwrap();

    let body: FailureResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error, "Invalid name: 1000 bytes exceeds the 768-byte key limit");
    assert!(server.mirror().is_empty());
}

#[tokio::test]
async fn test_stop_unknown_name() {
    let server = TestServer::start().await.unwrap();
    let name = unique_name();

    let response = server
        .post("/location", &LocationRequest::stop("dev1", &name))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "stop");

    let response = server.get("/queue").await.unwrap();
    let body: QueueResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.queue.is_empty());
}

#[tokio::test]
async fn test_start_stop_cycle() {
    let server = TestServer::start().await.unwrap();

    for (name, device) in [("amb2", "dev2"), ("amb1", "dev1"), ("amb3", "dev3")] {
        server
            .post("/location", &LocationRequest::start(device, name))
            .await
            .unwrap();
    }
    server
        .post("/location", &LocationRequest::stop("dev1", "amb1"))
        .await
        .unwrap();
    // Restart keeps the original position
    server
        .post("/location", &LocationRequest::start("dev2", "amb2"))
        .await
        .unwrap();

    let response = server.get("/queue").await.unwrap();
    let body: QueueResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.status, "success");
    assert_eq!(body.queue, vec!["amb2", "amb3"]);
    assert_eq!(server.tracker.stats().timers, 2);
}

#[tokio::test]
async fn test_coordinates_are_echoed_and_mirrored() {
    let server = TestServer::start().await.unwrap();

    let request = LocationRequest::start("dev1", "amb1").at(12.97, 77.59);
    let response = server.post("/location", &request).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["latitude"], 12.97);
    assert_eq!(body["longitude"], 77.59);

    let write = &server.mirror().writes()[0];
    assert_eq!(write.payload.latitude, Some(12.97));
    assert_eq!(write.payload.longitude, Some(77.59));
}

#[tokio::test]
async fn test_numeric_device_id() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post(
            "/location",
            &json!({"esp32_id": 1001, "name": "amb1", "status": "start"}),
        )
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["esp32_id"], "1001");
    assert_eq!(
        server.mirror().status_at("locations/amb1/1001"),
        Some(DeviceStatus::Start)
    );
}

#[tokio::test]
async fn test_body_without_content_type() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post_raw("/location", r#"{"esp32_id":"dev1","name":"amb1","status":"start"}"#)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_body() {
    let server = TestServer::start().await.unwrap();

    let response = server.post_raw("/location", "esp32_id=dev1").await.unwrap();

    let body: FailureResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.status, "failure");
}

#[tokio::test]
async fn test_upstream_failure() {
    let server = TestServer::start().await.unwrap();
    server.mirror().fail_with("Firebase write to locations/amb1/dev1 failed");

    let response = server
        .post("/location", &LocationRequest::start("dev1", "amb1"))
        .await
        .unwrap();

    let body: FailureResponse =
        assert_json(response, StatusCode::INTERNAL_SERVER_ERROR).await.unwrap();
    assert_eq!(body.error, "Firebase write to locations/amb1/dev1 failed");

    // The in-memory change stands
    let response = server.get("/queue").await.unwrap();
    let body: QueueResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.queue, vec!["amb1"]);
}

// ============================================================================
// Owner Scope Tests
// ============================================================================

#[tokio::test]
async fn test_per_user_queues() {
    let server = TestServer::start().await.unwrap();

    server
        .post("/location", &LocationRequest::start("dev1", "amb1").for_user("u1"))
        .await
        .unwrap();
    server
        .post("/location", &LocationRequest::start("dev2", "amb2").for_user("u2"))
        .await
        .unwrap();

    let response = server.get("/queue?user_id=u1").await.unwrap();
    let body: QueueResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.queue, vec!["amb1"]);

    let request = QueueRequest {
        user_id: "u2".to_string(),
    };
    let response = server.post("/queue", &request).await.unwrap();
    let body: QueueResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.queue, vec!["amb2"]);

    let response = server.get("/queue").await.unwrap();
    let body: QueueResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.queue.is_empty());

    assert_eq!(
        server.mirror().status_at("locations/amb1/dev1/u1"),
        Some(DeviceStatus::Start)
    );
}

#[tokio::test]
async fn test_owner_required() {
    let server = TestServer::start_with(&[("TRACKER_REQUIRE_OWNER", "true")])
        .await
        .unwrap();

    let response = server
        .post("/location", &LocationRequest::start("dev1", "amb1"))
        .await
        .unwrap();
    let body: FailureResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error, "Missing required fields");

    let response = server.get("/queue").await.unwrap();
    let body: FailureResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error, "Missing required field: user_id");

    let response = server
        .post("/location", &LocationRequest::start("dev1", "amb1").for_user("u1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Expiry Tests
// ============================================================================

#[tokio::test]
async fn test_expiry_reverts_to_stop() {
    let server = TestServer::start_with(&[("TRACKER_TIMEOUT_SECS", "1")])
        .await
        .unwrap();

    server
        .post("/location", &LocationRequest::start("dev1", "amb1"))
        .await
        .unwrap();

    wait_for_writes(server.mirror(), 2).await.unwrap();

    assert_eq!(
        server.mirror().status_at("locations/amb1/dev1"),
        Some(DeviceStatus::Stop)
    );
    let response = server.get("/queue").await.unwrap();
    let body: QueueResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.queue.is_empty());
}

#[tokio::test]
async fn test_stop_cancels_expiry() {
    let server = TestServer::start_with(&[("TRACKER_TIMEOUT_SECS", "1")])
        .await
        .unwrap();

    server
        .post("/location", &LocationRequest::start("dev1", "amb1"))
        .await
        .unwrap();
    server
        .post("/location", &LocationRequest::stop("dev1", "amb1"))
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(1500)).await;

    assert_eq!(server.mirror().len(), 2);
    assert_eq!(server.tracker.stats().timers, 0);
}

#[tokio::test]
async fn test_shutdown_rejects_new_events() {
    let server = TestServer::start().await.unwrap();

    server
        .post("/location", &LocationRequest::start("dev1", "amb1"))
        .await
        .unwrap();
    assert_eq!(server.tracker.shutdown(), 1);

    let response = server
        .post("/location", &LocationRequest::start("dev2", "amb2"))
        .await
        .unwrap();
    let body: FailureResponse =
        assert_json(response, StatusCode::SERVICE_UNAVAILABLE).await.unwrap();
    assert_eq!(body.error, "Tracker is shut down");
}
