//! Tracker script endpoint.

use axum::{
    http::header,
    response::IntoResponse,
};

/// The browser tracker, embedded at compile time.
static TRACKER_JS: &str = include_str!("../../assets/tracker.js");

/// Cache policy: 24h browser cache with a 1h stale-while-revalidate
/// window.
const TRACKER_CACHE_CONTROL: &str = "public, max-age=86400, stale-while-revalidate=3600";

/// GET /tracker.js - serves the embeddable tracker.
///
/// The script is configured purely through the `data-project`
/// attribute on its own script tag; there are no query parameters.
pub async fn tracker_handler() -> impl IntoResponse {
    (
        [
            (
                header::CONTENT_TYPE,
                "application/javascript; charset=utf-8",
            ),
            (header::CACHE_CONTROL, TRACKER_CACHE_CONTROL),
        ],
        TRACKER_JS,
    )
}
