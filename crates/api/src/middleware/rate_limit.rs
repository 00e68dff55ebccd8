//! Fixed-window rate limiting.

use parking_lot::Mutex;
use pulse_core::limits::{RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW_SECS};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Fixed-window rate limiter keyed by caller identity.
///
/// The window approximation permits up to 2x burst at window
/// boundaries in exchange for O(1) bookkeeping per identity. The map
/// lock makes check-and-increment atomic across concurrent requests.
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, WindowBucket>>,
    config: RateLimitConfig,
}

#[derive(Clone)]
pub struct RateLimitConfig {
    /// Window duration
    pub window: Duration,
    /// Admitted requests per window per identity
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(RATE_LIMIT_WINDOW_SECS),
            max_requests: RATE_LIMIT_MAX_REQUESTS,
        }
    }
}

/// Admission decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Throttled { retry_after_secs: u64 },
}

struct WindowBucket {
    count: u32,
    window_start: Instant,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Admit or throttle one request from the given identity.
    ///
    /// Counts every call, throttled or not, so an over-limit caller
    /// stays throttled until the window rolls over.
    pub fn admit(&self, identity: &str) -> Decision {
        let mut buckets = self.buckets.lock();
        let now = Instant::now();

        let bucket = buckets
            .entry(identity.to_string())
            .or_insert_with(|| WindowBucket {
                count: 0,
                window_start: now,
            });

        if now.duration_since(bucket.window_start) >= self.config.window {
            bucket.count = 0;
            bucket.window_start = now;
        }

        bucket.count += 1;

        if bucket.count > self.config.max_requests {
            let remaining = self
                .config
                .window
                .saturating_sub(now.duration_since(bucket.window_start));
            Decision::Throttled {
                retry_after_secs: remaining.as_secs().max(1),
            }
        } else {
            Decision::Allowed
        }
    }

    /// Drop buckets whose window expired more than one full window
    /// ago, bounding the map under many distinct callers.
    pub fn cleanup_stale(&self) {
        let mut buckets = self.buckets.lock();
        let now = Instant::now();
        let max_age = self.config.window * 2;

        buckets.retain(|_, bucket| now.duration_since(bucket.window_start) < max_age);
    }

    /// Number of live buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.lock().len()
    }
}

/// Shared rate limiter state.
pub type SharedRateLimiter = Arc<RateLimiter>;
