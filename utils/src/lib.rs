//! Shared utilities for the Athena adjudication engine.

pub mod logging;

pub use logging::{init_logging, LogFormat};
