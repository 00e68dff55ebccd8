//! Tests for the health check endpoint.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::setup::TestContext;

/// /health returns ok without authentication.
#[tokio::test]
async fn test_health_endpoint() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}

/// Health probes are exempt from ingest rate limiting.
#[tokio::test]
async fn test_health_never_throttled() {
    let ctx = TestContext::with_rate_limit(pulse_api::middleware::rate_limit::RateLimitConfig {
        window: std::time::Duration::from_secs(60),
        max_requests: 1,
    });
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for _ in 0..5 {
        let response = server.get("/health").await;
        assert_ne!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);
        response.assert_status_ok();
    }
}
