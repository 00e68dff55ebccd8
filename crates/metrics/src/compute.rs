//! Pure window computations over event rows.
//!
//! Every function takes an explicit reference time so the math is
//! deterministic under test. Null `user_id`/`session_id` values are
//! excluded from distinct counts, never treated as a distinct value.

use chrono::{DateTime, Duration, DurationRound, Utc};
use pulse_core::Event;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use pulse_core::limits::{
    ACTIVE_WINDOW_HOURS, GROWTH_LOOKBACK_DAYS, RETENTION_WINDOW_DAYS, SERIES_HORIZON_DAYS,
};

/// Metric families rendered as dashboard sparklines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Churn,
    Users,
    Sessions,
    Engagement,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Churn => "churn",
            Self::Users => "users",
            Self::Sessions => "sessions",
            Self::Engagement => "engagement",
        }
    }
}

/// One point of a daily metric series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// One wall-clock-hour bucket of distinct active users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyPoint {
    pub timestamp: DateTime<Utc>,
    pub count: u64,
}

fn truncate_to_hour(at: DateTime<Utc>) -> DateTime<Utc> {
    at.duration_trunc(Duration::hours(1)).unwrap_or(at)
}

fn truncate_to_day(at: DateTime<Utc>) -> DateTime<Utc> {
    at.duration_trunc(Duration::days(1)).unwrap_or(at)
}

/// Distinct user ids within `[from, to)`.
fn users_within<'a>(
    events: &'a [Event],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> HashSet<&'a str> {
    events
        .iter()
        .filter(|e| e.timestamp >= from && e.timestamp < to)
        .filter_map(|e| e.user_id.as_deref())
        .collect()
}

/// Distinct user count over a pre-filtered row set.
pub fn distinct_users(events: &[Event]) -> u64 {
    events
        .iter()
        .filter_map(|e| e.user_id.as_deref())
        .collect::<HashSet<_>>()
        .len() as u64
}

/// Distinct session count over a pre-filtered row set. Any session id
/// appearing in any event counts.
pub fn distinct_sessions(events: &[Event]) -> u64 {
    events
        .iter()
        .filter_map(|e| e.session_id.as_deref())
        .collect::<HashSet<_>>()
        .len() as u64
}

/// Percentage of prior-window users absent from the current window.
/// 0.0 when the prior window has no users.
pub fn churn_rate(events: &[Event], at: DateTime<Utc>) -> f64 {
    let week = Duration::days(RETENTION_WINDOW_DAYS);
    let prior = users_within(events, at - week - week, at - week);
    if prior.is_empty() {
        return 0.0;
    }
    let current = users_within(events, at - week, at);
    let churned = prior.iter().filter(|u| !current.contains(*u)).count();
    churned as f64 / prior.len() as f64 * 100.0
}

/// Percentage of prior-window users who returned in the current
/// window. Computed independently of churn; 0.0 when the prior window
/// has no users.
pub fn engagement_rate(events: &[Event], at: DateTime<Utc>) -> f64 {
    let week = Duration::days(RETENTION_WINDOW_DAYS);
    let prior = users_within(events, at - week - week, at - week);
    if prior.is_empty() {
        return 0.0;
    }
    let current = users_within(events, at - week, at);
    let retained = prior.iter().filter(|u| current.contains(*u)).count();
    retained as f64 / prior.len() as f64 * 100.0
}

/// Distinct active users per wall-clock hour over the trailing 24
/// hours. The last bucket is the (partial) hour containing `at`.
pub fn active_users_by_hour(events: &[Event], at: DateTime<Utc>) -> Vec<HourlyPoint> {
    let end = truncate_to_hour(at);
    let start = end - Duration::hours(ACTIVE_WINDOW_HOURS - 1);
    (0..ACTIVE_WINDOW_HOURS)
        .map(|i| {
            let bucket = start + Duration::hours(i);
            let count = users_within(events, bucket, bucket + Duration::hours(1)).len() as u64;
            HourlyPoint {
                timestamp: bucket,
                count,
            }
        })
        .collect()
}

/// One metric value for a window ending at `at`.
pub fn metric_value_at(events: &[Event], kind: MetricKind, at: DateTime<Utc>) -> f64 {
    let day = Duration::hours(ACTIVE_WINDOW_HOURS);
    match kind {
        MetricKind::Users => users_within(events, at - day, at).len() as f64,
        MetricKind::Sessions => events
            .iter()
            .filter(|e| e.timestamp >= at - day && e.timestamp < at)
            .filter_map(|e| e.session_id.as_deref())
            .collect::<HashSet<_>>()
            .len() as f64,
        MetricKind::Churn => churn_rate(events, at),
        MetricKind::Engagement => engagement_rate(events, at),
    }
}

/// Daily series over the trailing horizon, one point per UTC day.
/// Each point's value covers the window ending at that day's end.
pub fn time_series(events: &[Event], kind: MetricKind, at: DateTime<Utc>) -> Vec<SeriesPoint> {
    let today = truncate_to_day(at);
    (0..SERIES_HORIZON_DAYS)
        .map(|i| {
            let day = today - Duration::days(SERIES_HORIZON_DAYS - 1 - i);
            SeriesPoint {
                timestamp: day,
                value: metric_value_at(events, kind, day + Duration::days(1)),
            }
        })
        .collect()
}

/// Percentage change between the series value 7 days before the end
/// and the final value. 0.0 when the baseline is 0 or the series is
/// empty.
pub fn growth(series: &[SeriesPoint]) -> f64 {
    let Some(latest) = series.last() else {
        return 0.0;
    };
    let baseline_idx = series.len().saturating_sub(GROWTH_LOOKBACK_DAYS as usize + 1);
    let baseline = series[baseline_idx].value;
    if baseline == 0.0 {
        return 0.0;
    }
    (latest.value - baseline) / baseline * 100.0
}
