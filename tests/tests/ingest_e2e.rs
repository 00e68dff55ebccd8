//! End-to-end tests for the ingestion gateway happy path.
//!
//! POST /ingest → authenticated, validated, persisted to the store.

use axum::http::{Method, StatusCode};
use axum_test::TestServer;
use chrono::{Duration, Utc};
use integration_tests::{fixtures, setup::TestContext};
use uuid::Uuid;

/// A valid public-key payload is persisted and acknowledged with its id.
#[tokio::test]
async fn test_ingest_page_view_persists() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.post("/ingest").json(&fixtures::page_view_payload()).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);

    let id = body["id"].as_str().expect("id should be a string");
    let id: Uuid = id.parse().expect("id should be a UUID");

    assert_eq!(ctx.event_count(), 1);
    let stored = ctx.stored_events().await;
    assert_eq!(stored[0].id, id);
    assert_eq!(stored[0].project_id, fixtures::PROJECT_ID);
    assert_eq!(stored[0].event_name, "page_view");
    assert_eq!(stored[0].url.as_deref(), Some("https://example.com/pricing"));
}

/// A secret bearer token authenticates without any key in the body.
#[tokio::test]
async fn test_ingest_bearer_secret_key() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let payload = serde_json::json!({ "eventName": "server_event" });
    let response = server
        .post("/ingest")
        .add_header(
            "Authorization",
            format!("Bearer {}", fixtures::SECRET_KEY),
        )
        .json(&payload)
        .await;

    response.assert_status_ok();
    assert_eq!(ctx.event_count(), 1);
    let stored = ctx.stored_events().await;
    assert_eq!(stored[0].event_name, "server_event");
}

/// Omitted optional fields receive server-side defaults.
#[tokio::test]
async fn test_ingest_applies_defaults() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.post("/ingest").json(&fixtures::minimal_payload()).await;
    response.assert_status_ok();

    let stored = ctx.stored_events().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].user_id, None);
    assert_eq!(stored[0].session_id, None);
    assert_eq!(stored[0].url, None);
    assert_eq!(stored[0].metadata, serde_json::json!({}));
    // Missing timestamp defaults to receipt time.
    assert!(Utc::now() - stored[0].timestamp < Duration::seconds(5));
}

/// Epoch-milliseconds timestamps are accepted alongside ISO-8601.
#[tokio::test]
async fn test_ingest_epoch_millis_timestamp() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let sent = Utc::now() - Duration::hours(2);
    let mut payload = fixtures::minimal_payload();
    payload["timestamp"] = serde_json::json!(sent.timestamp_millis());

    server.post("/ingest").json(&payload).await.assert_status_ok();

    let stored = ctx.stored_events().await;
    assert_eq!(stored[0].timestamp.timestamp_millis(), sent.timestamp_millis());
}

/// Bot-like user agents are flagged in logs but never rejected.
#[tokio::test]
async fn test_bot_user_agent_still_persisted() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/ingest")
        .add_header(
            "User-Agent",
            "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
        )
        .json(&fixtures::page_view_payload())
        .await;

    response.assert_status_ok();
    assert_eq!(ctx.event_count(), 1);
}

/// CORS preflight is answered with 204 and no auth requirement.
#[tokio::test]
async fn test_options_preflight() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.method(Method::OPTIONS, "/ingest").await;

    response.assert_status(StatusCode::NO_CONTENT);
    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "*"
    );
    assert_eq!(
        headers.get("access-control-allow-methods").unwrap(),
        "POST, OPTIONS"
    );
    assert_eq!(
        headers.get("access-control-allow-headers").unwrap(),
        "Content-Type, Authorization"
    );
}

/// Regular responses carry the wildcard CORS origin header too.
#[tokio::test]
async fn test_cors_header_on_post_response() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.post("/ingest").json(&fixtures::page_view_payload()).await;
    response.assert_status_ok();
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
