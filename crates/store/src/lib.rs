//! Event store seam for the Pulse telemetry pipeline.
//!
//! The backing database is an external collaborator; the pipeline only
//! depends on this trait. `MemoryStore` is the bundled single-process
//! backend, used in production wiring and tests alike.

pub mod memory;
pub mod registry;

pub use memory::MemoryStore;
pub use registry::KeyRegistry;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pulse_core::{Event, Result};

/// Half-open time range filter for event reads. `None` bounds are
/// unbounded. `from` is inclusive, `to` exclusive.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl EventRange {
    /// Everything on record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Events at or after `from`.
    pub fn since(from: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    /// Events in `[from, to)`.
    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Whether a timestamp falls inside the range.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| ts >= from) && self.to.map_or(true, |to| ts < to)
    }
}

/// Storage backend for projects, their keys, and the event log.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append one event. Events are immutable once written.
    async fn append(&self, event: Event) -> Result<()>;

    /// Fetch a project's events within a range, ordered by timestamp.
    async fn events(&self, project_id: &str, range: EventRange) -> Result<Vec<Event>>;

    /// Resolve a public key to its project by exact match.
    async fn project_by_public_key(&self, key: &str) -> Result<Option<String>>;

    /// Resolve a secret key to its project by exact match.
    async fn project_by_secret_key(&self, key: &str) -> Result<Option<String>>;

    /// Whether a project exists.
    async fn project_exists(&self, project_id: &str) -> Result<bool>;
}
