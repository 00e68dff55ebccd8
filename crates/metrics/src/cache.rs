//! Time-boxed, tag-invalidated memoization of the overview bundle.

use moka::future::Cache;
use parking_lot::Mutex;
use pulse_core::limits::{OVERVIEW_CACHE_MAX_CAPACITY, OVERVIEW_CACHE_TTL_SECS};
use pulse_store::EventStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::engine::{MetricBundle, MetricsEngine};

/// Cache key: `(project, user context, project generation)`.
type CacheKey = (String, String, u64);

/// Read-through cache over `MetricsEngine::overview`.
///
/// Entries expire after the TTL. Invalidation is by tag: each project
/// has a generation counter baked into the key, so bumping it orphans
/// every cached entry for that project; orphans age out under the
/// capacity bound. Concurrent misses for one key are collapsed into a
/// single recomputation by `try_get_with`.
pub struct MetricsCache {
    engine: MetricsEngine,
    store: Arc<dyn EventStore>,
    cache: Cache<CacheKey, Arc<MetricBundle>>,
    generations: Mutex<HashMap<String, u64>>,
}

impl MetricsCache {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self::with_ttl(store, Duration::from_secs(OVERVIEW_CACHE_TTL_SECS))
    }

    /// Create with a custom TTL.
    pub fn with_ttl(store: Arc<dyn EventStore>, ttl: Duration) -> Self {
        Self {
            engine: MetricsEngine::new(store.clone()),
            store,
            cache: Cache::builder()
                .max_capacity(OVERVIEW_CACHE_MAX_CAPACITY)
                .time_to_live(ttl)
                .build(),
            generations: Mutex::new(HashMap::new()),
        }
    }

    fn generation(&self, project_id: &str) -> u64 {
        self.generations
            .lock()
            .get(project_id)
            .copied()
            .unwrap_or(0)
    }

    /// Force recomputation for a project before the TTL lapses, e.g.
    /// after a manual refresh action on the write path.
    pub fn invalidate_project(&self, project_id: &str) {
        let mut generations = self.generations.lock();
        *generations.entry(project_id.to_string()).or_insert(0) += 1;
    }

    /// The overview bundle for a project, recomputed on miss.
    ///
    /// `None` when the project does not exist or computation fails; an
    /// empty analytics history is not an error and still yields a
    /// (zeroed) bundle.
    pub async fn overview(&self, project_id: &str, user_id: &str) -> Option<Arc<MetricBundle>> {
        match self.store.project_exists(project_id).await {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                warn!(project_id = %project_id, error = %e, "Project lookup failed");
                return None;
            }
        }

        let key = (
            project_id.to_string(),
            user_id.to_string(),
            self.generation(project_id),
        );
        let engine = self.engine.clone();
        let project = project_id.to_string();

        let result = self
            .cache
            .try_get_with(key, async move {
                debug!(project_id = %project, "Recomputing overview metrics");
                engine.overview(&project).await.map(Arc::new)
            })
            .await;

        match result {
            Ok(bundle) => Some(bundle),
            Err(e) => {
                warn!(project_id = %project_id, error = %e, "Overview metrics computation failed");
                None
            }
        }
    }
}
