//! Tests for the embeddable tracker script endpoint.

use axum_test::TestServer;
use integration_tests::setup::TestContext;

/// The script is served as JavaScript with long-lived edge caching.
#[tokio::test]
async fn test_tracker_headers() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/tracker.js").await;
    response.assert_status_ok();

    let headers = response.headers();
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(
        content_type.starts_with("application/javascript"),
        "Unexpected content type: {}",
        content_type
    );
    assert_eq!(
        headers.get("cache-control").unwrap(),
        "public, max-age=86400, stale-while-revalidate=3600"
    );
}

/// The script carries every tracking behavior the snippet promises.
#[tokio::test]
async fn test_tracker_script_behaviors() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let body = server.get("/tracker.js").await.text();

    // Identity persistence
    assert!(body.contains("pulse_visitor_id"));
    assert!(body.contains("pulse_session_id"));
    assert!(body.contains("localStorage"));
    assert!(body.contains("sessionStorage"));

    // Automatic events
    assert!(body.contains("session_start"));
    assert!(body.contains("page_view"));
    assert!(body.contains("heartbeat"));
    assert!(body.contains("30000"), "Heartbeat should fire every 30s");

    // Manual API
    assert!(body.contains("identify"));
    assert!(body.contains("track"));

    // Delivery and SPA handling
    assert!(body.contains("sendBeacon"));
    assert!(body.contains("MutationObserver"));
    assert!(body.contains("data-project"));
}

/// Serving the script does not consume ingest rate-limit budget.
#[tokio::test]
async fn test_tracker_not_rate_limited() {
    let ctx = TestContext::with_rate_limit(pulse_api::middleware::rate_limit::RateLimitConfig {
        window: std::time::Duration::from_secs(60),
        max_requests: 1,
    });
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for _ in 0..5 {
        server.get("/tracker.js").await.assert_status_ok();
    }
}
