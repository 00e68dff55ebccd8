//! Logging for the Pulse telemetry pipeline.

pub mod tracing_setup;

pub use tracing_setup::*;
