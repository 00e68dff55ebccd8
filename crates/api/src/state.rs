//! Application state shared across handlers.

use crate::middleware::rate_limit::{RateLimitConfig, RateLimiter, SharedRateLimiter};
use pulse_store::{EventStore, KeyRegistry};
use std::sync::Arc;
use std::time::Duration;

/// How often the stale-bucket sweep runs.
const RATE_LIMITER_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Shared application state.
///
/// The rate limiter is the only mutable shared resource in the
/// ingestion path; everything else is read-only per request.
#[derive(Clone)]
pub struct AppState {
    /// Event store backend
    pub store: Arc<dyn EventStore>,
    /// Project key registry over the store
    pub registry: KeyRegistry,
    /// Per-identity fixed-window rate limiter
    pub rate_limiter: SharedRateLimiter,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self::with_rate_limit(store, RateLimitConfig::default())
    }

    /// Create with custom rate limit config.
    pub fn with_rate_limit(store: Arc<dyn EventStore>, rate_config: RateLimitConfig) -> Self {
        Self {
            registry: KeyRegistry::new(store.clone()),
            store,
            rate_limiter: Arc::new(RateLimiter::new(rate_config)),
        }
    }

    /// Start the rate limiter cleanup background task.
    /// Returns a handle that can be used to cancel the task.
    pub fn start_rate_limiter_cleanup(&self) -> tokio::task::JoinHandle<()> {
        let rate_limiter = self.rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(RATE_LIMITER_SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                rate_limiter.cleanup_stale();
            }
        })
    }
}
