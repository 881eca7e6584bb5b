//! Stake-weighted voting for the Athena adjudication engine.
//!
//! A single decision primitive reused for disputes, skill-verification
//! applications and questions:
//! - one immutable ballot per identity per decision,
//! - weights from oracle stake (or DAO voting power where allowed),
//! - a finalization rule evaluated after every ballot.

pub mod ballot;
pub mod engine;
pub mod error;
pub mod tally;
pub mod weight;

pub use ballot::{Ballot, BallotBook, ReasonEntry};
pub use engine::{CastOutcome, Decision, StakeWeightedVoting, VoteContext};
pub use error::VotingError;
pub use tally::{ExplicitResolution, FinalizationRule, QuorumMajority, Tally, Verdict};
pub use weight::{resolve_weight, VoteWeight, VoterPolicy, WeightSource};
