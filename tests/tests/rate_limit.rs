//! Rate limiting tests against the live router.
//!
//! Identity is the first X-Forwarded-For entry, falling back to a
//! shared "unknown" bucket. The limiter runs before any other
//! processing, so even garbage requests consume budget.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{fixtures, setup::TestContext};
use pulse_api::middleware::rate_limit::RateLimitConfig;
use std::time::Duration;

fn small_limit(max_requests: u32) -> RateLimitConfig {
    RateLimitConfig {
        window: Duration::from_secs(60),
        max_requests,
    }
}

/// The first 100 requests in a window pass, everything after is 429.
#[tokio::test]
async fn test_window_admits_exactly_100() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let mut ok = 0;
    let mut throttled = 0;
    for i in 0..150 {
        let response = server
            .post("/ingest")
            .add_header("X-Forwarded-For", "203.0.113.9")
            .json(&fixtures::page_view_payload())
            .await;

        match response.status_code() {
            StatusCode::OK => {
                assert!(i < 100, "Request {} admitted past the window limit", i);
                ok += 1;
            }
            StatusCode::TOO_MANY_REQUESTS => {
                assert!(i >= 100, "Request {} throttled before the limit", i);
                let body: serde_json::Value = response.json();
                assert_eq!(body["code"], "RATE_001");
                assert!(
                    response.headers().get("retry-after").is_some(),
                    "429 should carry Retry-After"
                );
                throttled += 1;
            }
            other => panic!("Unexpected status {}", other),
        }
    }

    assert_eq!(ok, 100);
    assert_eq!(throttled, 50);
    assert_eq!(ctx.event_count(), 100);
}

/// Each forwarded address gets its own budget.
#[tokio::test]
async fn test_identities_do_not_share_budget() {
    let ctx = TestContext::with_rate_limit(small_limit(2));
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for _ in 0..2 {
        server
            .post("/ingest")
            .add_header("X-Forwarded-For", "198.51.100.1")
            .json(&fixtures::page_view_payload())
            .await
            .assert_status_ok();
    }
    server
        .post("/ingest")
        .add_header("X-Forwarded-For", "198.51.100.1")
        .json(&fixtures::page_view_payload())
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    // A different caller is unaffected.
    server
        .post("/ingest")
        .add_header("X-Forwarded-For", "198.51.100.2")
        .json(&fixtures::page_view_payload())
        .await
        .assert_status_ok();
}

/// Only the first X-Forwarded-For entry identifies the caller.
#[tokio::test]
async fn test_first_forwarded_entry_wins() {
    let ctx = TestContext::with_rate_limit(small_limit(1));
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server
        .post("/ingest")
        .add_header("X-Forwarded-For", "198.51.100.7, 10.0.0.1")
        .json(&fixtures::page_view_payload())
        .await
        .assert_status_ok();

    // Same client, different proxy chain tail: same bucket.
    server
        .post("/ingest")
        .add_header("X-Forwarded-For", "198.51.100.7, 10.0.0.2")
        .json(&fixtures::page_view_payload())
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

/// Requests without a forwarded header share the fallback bucket.
#[tokio::test]
async fn test_missing_header_shares_fallback_bucket() {
    let ctx = TestContext::with_rate_limit(small_limit(1));
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server
        .post("/ingest")
        .json(&fixtures::page_view_payload())
        .await
        .assert_status_ok();
    server
        .post("/ingest")
        .json(&fixtures::page_view_payload())
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

/// The limiter runs before validation and auth: an over-budget caller
/// gets 429 even for a request that would otherwise be a 400.
#[tokio::test]
async fn test_throttle_precedes_validation() {
    let ctx = TestContext::with_rate_limit(small_limit(1));
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server
        .post("/ingest")
        .add_header("X-Forwarded-For", "198.51.100.3")
        .json(&fixtures::page_view_payload())
        .await
        .assert_status_ok();

    let response = server
        .post("/ingest")
        .add_header("X-Forwarded-For", "198.51.100.3")
        .content_type("application/json")
        .bytes("{not valid json".into())
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}

/// Budget is restored once the window rolls over.
#[tokio::test]
async fn test_window_rollover_restores_budget() {
    let ctx = TestContext::with_rate_limit(RateLimitConfig {
        window: Duration::from_millis(100),
        max_requests: 1,
    });
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server
        .post("/ingest")
        .json(&fixtures::page_view_payload())
        .await
        .assert_status_ok();
    server
        .post("/ingest")
        .json(&fixtures::page_view_payload())
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    tokio::time::sleep(Duration::from_millis(150)).await;

    server
        .post("/ingest")
        .json(&fixtures::page_view_payload())
        .await
        .assert_status_ok();
}
