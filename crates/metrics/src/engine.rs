//! Metrics engine: fetches event rows and derives rolling-window
//! statistics.

use chrono::{DateTime, Duration, Utc};
use pulse_core::limits::{
    ACTIVE_WINDOW_HOURS, ONLINE_WINDOW_SECS, RETENTION_WINDOW_DAYS, SERIES_HORIZON_DAYS,
};
use pulse_core::Result;
use pulse_store::{EventRange, EventStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::compute::{self, HourlyPoint, MetricKind, SeriesPoint};

/// The joined overview computation, consumed by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricBundle {
    pub active_users_24h: u64,
    pub active_users_7d: u64,
    pub active_users_30d: u64,
    pub sessions_24h: u64,
    pub users_online: u64,
    pub all_time_users: u64,
    pub churn_rate: f64,
    pub engagement_rate: f64,
    pub active_users_by_hour: Vec<HourlyPoint>,
    pub series: MetricSeries,
    pub growth: MetricGrowth,
    pub computed_at: DateTime<Utc>,
}

/// Daily sparkline series per metric kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSeries {
    pub users: Vec<SeriesPoint>,
    pub sessions: Vec<SeriesPoint>,
    pub churn: Vec<SeriesPoint>,
    pub engagement: Vec<SeriesPoint>,
}

/// Trailing-week growth percentage per metric kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricGrowth {
    pub users: f64,
    pub sessions: f64,
    pub churn: f64,
    pub engagement: f64,
}

/// Derives statistics from the event store. Every method is a pure
/// function of the store's rows; nothing here mutates state.
#[derive(Clone)]
pub struct MetricsEngine {
    store: Arc<dyn EventStore>,
}

impl MetricsEngine {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    async fn fetch_trailing(&self, project_id: &str, window: Duration) -> Result<Vec<pulse_core::Event>> {
        self.store
            .events(project_id, EventRange::since(Utc::now() - window))
            .await
    }

    /// Distinct users within the trailing window.
    pub async fn active_users(&self, project_id: &str, window: Duration) -> Result<u64> {
        let events = self.fetch_trailing(project_id, window).await?;
        Ok(compute::distinct_users(&events))
    }

    /// Distinct sessions within the trailing 24 hours.
    pub async fn sessions(&self, project_id: &str) -> Result<u64> {
        let events = self
            .fetch_trailing(project_id, Duration::hours(ACTIVE_WINDOW_HOURS))
            .await?;
        Ok(compute::distinct_sessions(&events))
    }

    /// Distinct users within the trailing 5 minutes, the live
    /// indicator.
    pub async fn users_online(&self, project_id: &str) -> Result<u64> {
        let events = self
            .fetch_trailing(project_id, Duration::seconds(ONLINE_WINDOW_SECS))
            .await?;
        Ok(compute::distinct_users(&events))
    }

    /// Distinct users with no time bound.
    pub async fn all_time_users(&self, project_id: &str) -> Result<u64> {
        let events = self.store.events(project_id, EventRange::all()).await?;
        Ok(compute::distinct_users(&events))
    }

    /// Week-over-week churn percentage.
    pub async fn churn_rate(&self, project_id: &str) -> Result<f64> {
        let events = self
            .fetch_trailing(project_id, Duration::days(2 * RETENTION_WINDOW_DAYS))
            .await?;
        Ok(compute::churn_rate(&events, Utc::now()))
    }

    /// Week-over-week engagement percentage.
    pub async fn engagement_rate(&self, project_id: &str) -> Result<f64> {
        let events = self
            .fetch_trailing(project_id, Duration::days(2 * RETENTION_WINDOW_DAYS))
            .await?;
        Ok(compute::engagement_rate(&events, Utc::now()))
    }

    /// Hourly distinct-user buckets over the trailing 24 hours.
    pub async fn active_users_by_hour(&self, project_id: &str) -> Result<Vec<HourlyPoint>> {
        let events = self
            .fetch_trailing(project_id, Duration::hours(ACTIVE_WINDOW_HOURS))
            .await?;
        Ok(compute::active_users_by_hour(&events, Utc::now()))
    }

    /// Daily sparkline series for one metric kind.
    pub async fn time_series(
        &self,
        project_id: &str,
        kind: MetricKind,
    ) -> Result<Vec<SeriesPoint>> {
        let events = self.fetch_series_horizon(project_id).await?;
        Ok(compute::time_series(&events, kind, Utc::now()))
    }

    /// Trailing-week growth for one metric kind.
    pub async fn growth(&self, project_id: &str, kind: MetricKind) -> Result<f64> {
        Ok(compute::growth(&self.time_series(project_id, kind).await?))
    }

    // The earliest series point still looks back two retention windows
    // for its churn/engagement value.
    async fn fetch_series_horizon(&self, project_id: &str) -> Result<Vec<pulse_core::Event>> {
        self.fetch_trailing(
            project_id,
            Duration::days(SERIES_HORIZON_DAYS + 2 * RETENTION_WINDOW_DAYS),
        )
        .await
    }

    /// The full overview bundle. Sub-queries read disjoint aggregates
    /// from the same event set, so they are issued concurrently and
    /// joined.
    pub async fn overview(&self, project_id: &str) -> Result<MetricBundle> {
        let (
            active_users_24h,
            active_users_7d,
            active_users_30d,
            sessions_24h,
            users_online,
            all_time_users,
            churn_rate,
            engagement_rate,
            active_users_by_hour,
        ) = tokio::try_join!(
            self.active_users(project_id, Duration::hours(ACTIVE_WINDOW_HOURS)),
            self.active_users(project_id, Duration::days(7)),
            self.active_users(project_id, Duration::days(30)),
            self.sessions(project_id),
            self.users_online(project_id),
            self.all_time_users(project_id),
            self.churn_rate(project_id),
            self.engagement_rate(project_id),
            self.active_users_by_hour(project_id),
        )?;

        let (users, sessions, churn, engagement) = tokio::try_join!(
            self.time_series(project_id, MetricKind::Users),
            self.time_series(project_id, MetricKind::Sessions),
            self.time_series(project_id, MetricKind::Churn),
            self.time_series(project_id, MetricKind::Engagement),
        )?;

        let growth = MetricGrowth {
            users: compute::growth(&users),
            sessions: compute::growth(&sessions),
            churn: compute::growth(&churn),
            engagement: compute::growth(&engagement),
        };

        Ok(MetricBundle {
            active_users_24h,
            active_users_7d,
            active_users_30d,
            sessions_24h,
            users_online,
            all_time_users,
            churn_rate,
            engagement_rate,
            active_users_by_hour,
            series: MetricSeries {
                users,
                sessions,
                churn,
                engagement,
            },
            growth,
            computed_at: Utc::now(),
        })
    }
}
