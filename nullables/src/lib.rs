//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator the engine talks to (job ledger, voting power, fee
//! token, governance action sinks, clock) has an in-memory implementation
//! here that:
//! - returns deterministic values,
//! - can be told to fail or decline,
//! - records what was asked of it.
//!
//! Handles are `Clone` and share state, so a test can hand one copy to the
//! engine and keep another for inspection.

pub mod clock;
pub mod governance;
pub mod ledger;
pub mod token;
pub mod voting_power;

pub use clock::NullClock;
pub use governance::NullGovernanceSink;
pub use ledger::{NullJob, NullJobLedger};
pub use token::NullFeeToken;
pub use voting_power::NullVotingPower;
