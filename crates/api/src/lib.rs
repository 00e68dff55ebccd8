//! HTTP API layer for the Pulse telemetry pipeline.

pub mod extractors;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
