//! Size and window limits for the telemetry pipeline.
//!
//! MEMORY SAFETY: the byte limits prevent DoS via memory exhaustion;
//! the window constants pin the product semantics of the rate limiter
//! and the metrics engine in one place.
//!
//! # Usage Note
//!
//! The `#[validate]` derive macro requires literal values in
//! attributes, so field limits are duplicated there. Keep both in
//! sync when modifying.

// === Ingest Limits ===

/// Maximum ingest body size in bytes (50KiB).
///
/// Checked against the declared Content-Length before the body is
/// parsed. A single telemetry event has no business being larger.
pub const MAX_INGEST_BODY_BYTES: usize = 50 * 1024;

/// Maximum metadata JSON size in bytes (16KB).
///
/// Balances flexibility with memory safety. Most real-world event
/// metadata is under 1KB.
pub const MAX_METADATA_BYTES: usize = 16 * 1024;

/// Event name max length.
pub const MAX_EVENT_NAME_LEN: usize = 200;

/// User ID max length.
/// UUIDs=36, emails=~50, custom IDs up to 128.
pub const MAX_USER_ID_LEN: usize = 128;

/// Session ID max length.
pub const MAX_SESSION_ID_LEN: usize = 128;

/// URL max length.
/// Matches the HTTP Referer header limit.
pub const MAX_URL_LEN: usize = 2048;

// === Rate Limiting ===

/// Fixed window duration in seconds.
pub const RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Admitted requests per window per caller identity.
pub const RATE_LIMIT_MAX_REQUESTS: u32 = 100;

// === Metrics Windows ===

/// Trailing window for the "users online" live indicator (5 minutes).
pub const ONLINE_WINDOW_SECS: i64 = 300;

/// Default trailing window for active users and sessions (24 hours).
pub const ACTIVE_WINDOW_HOURS: i64 = 24;

/// Churn/engagement comparison window (7 days each side).
pub const RETENTION_WINDOW_DAYS: i64 = 7;

/// Daily time-series horizon for sparklines (30 days).
pub const SERIES_HORIZON_DAYS: i64 = 30;

/// Growth lookback within a series (7 days).
pub const GROWTH_LOOKBACK_DAYS: i64 = 7;

// === Caching ===

/// Overview metrics cache TTL in seconds (5 minutes).
pub const OVERVIEW_CACHE_TTL_SECS: u64 = 300;

/// Maximum overview cache entries.
pub const OVERVIEW_CACHE_MAX_CAPACITY: u64 = 10_000;

// === Tracker Script ===

/// Browser cache lifetime for /tracker.js (24 hours).
pub const TRACKER_CACHE_MAX_AGE_SECS: u64 = 86_400;

/// Stale-while-revalidate window for /tracker.js (1 hour).
pub const TRACKER_STALE_WHILE_REVALIDATE_SECS: u64 = 3_600;

// === Bot Heuristic ===

/// Case-insensitive user-agent substrings that mark bot-like traffic.
/// Matches are logged, never blocked.
pub const BOT_UA_PATTERN: &str = r"(?i)(bot|crawler|spider|crawl|slurp|scraper|headless)";
