//! Fundamental types for the Athena adjudication engine.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: addresses, decision ids, timestamps, the engine parameters,
//! quorum arithmetic, and the error taxonomy.

pub mod address;
pub mod error;
pub mod ids;
pub mod params;
pub mod quorum;
pub mod time;

pub use address::Address;
pub use error::ErrorKind;
pub use ids::{ApplicationId, DisputeId, JobId, QuestionId};
pub use params::EngineParams;
pub use time::Timestamp;
