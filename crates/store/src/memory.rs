//! In-memory event store.

use async_trait::async_trait;
use parking_lot::RwLock;
use pulse_core::error::StoreErrorCode;
use pulse_core::{Error, Event, KeyPair, Result};
use std::sync::Arc;

use crate::{EventRange, EventStore};

/// A registered project and its issued keys.
#[derive(Debug, Clone)]
struct ProjectRecord {
    project_id: String,
    keys: KeyPair,
}

/// Single-process store keeping projects and the event log in memory.
///
/// Shared via `Arc` between the gateway and the metrics engine. The
/// failure switch exists so tests can exercise the write-failure path
/// without a real backend.
#[derive(Clone, Default)]
pub struct MemoryStore {
    projects: Arc<RwLock<Vec<ProjectRecord>>>,
    events: Arc<RwLock<Vec<Event>>>,
    should_fail: Arc<RwLock<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project with its credential pair.
    pub fn register_project(&self, project_id: impl Into<String>, keys: KeyPair) {
        self.projects.write().push(ProjectRecord {
            project_id: project_id.into(),
            keys,
        });
    }

    /// Number of stored events for a project.
    pub fn event_count(&self, project_id: &str) -> usize {
        self.events
            .read()
            .iter()
            .filter(|e| e.project_id == project_id)
            .count()
    }

    /// Set failure mode for testing error handling.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.write() = fail;
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn append(&self, event: Event) -> Result<()> {
        if *self.should_fail.read() {
            return Err(Error::store(
                StoreErrorCode::WriteFailed,
                "memory store failure mode",
            ));
        }
        self.events.write().push(event);
        Ok(())
    }

    async fn events(&self, project_id: &str, range: EventRange) -> Result<Vec<Event>> {
        if *self.should_fail.read() {
            return Err(Error::store(
                StoreErrorCode::QueryFailed,
                "memory store failure mode",
            ));
        }
        let mut rows: Vec<Event> = self
            .events
            .read()
            .iter()
            .filter(|e| e.project_id == project_id && range.contains(e.timestamp))
            .cloned()
            .collect();
        rows.sort_by_key(|e| e.timestamp);
        Ok(rows)
    }

    async fn project_by_public_key(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .projects
            .read()
            .iter()
            .find(|p| p.keys.public_key == key)
            .map(|p| p.project_id.clone()))
    }

    async fn project_by_secret_key(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .projects
            .read()
            .iter()
            .find(|p| p.keys.secret_key == key)
            .map(|p| p.project_id.clone()))
    }

    async fn project_exists(&self, project_id: &str) -> Result<bool> {
        Ok(self
            .projects
            .read()
            .iter()
            .any(|p| p.project_id == project_id))
    }
}
