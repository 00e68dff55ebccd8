//! Core types, limits, and validation for the Pulse telemetry pipeline.

pub mod error;
pub mod event;
pub mod keys;
pub mod limits;

pub use error::{Error, Result};
pub use event::*;
pub use keys::*;
