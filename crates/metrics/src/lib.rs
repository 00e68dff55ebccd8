//! Rolling-window metrics over the event store.
//!
//! `compute` holds the pure window math, `engine` fetches event rows
//! and fans the sub-computations out, `cache` memoizes the overview
//! bundle for dashboard reads.

pub mod cache;
pub mod compute;
pub mod engine;

pub use cache::MetricsCache;
pub use compute::{HourlyPoint, MetricKind, SeriesPoint};
pub use engine::{MetricBundle, MetricGrowth, MetricSeries, MetricsEngine};
