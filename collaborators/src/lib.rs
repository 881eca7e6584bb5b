//! Abstract collaborator traits for the Athena engine.
//!
//! The engine never holds value and never talks to other chains itself.
//! Everything outside its own records sits behind one of these traits:
//! the job/escrow ledger, the voting-power (DAO) source, the fee token,
//! and the governance-action trackers. Production deployments bridge them
//! to the real contracts; tests use `athena-nullables`.
//!
//! Calls are synchronous and must not re-enter the engine.

pub mod clock;
pub mod error;
pub mod governance;
pub mod ledger;
pub mod token;
pub mod voting_power;

pub use clock::{Clock, SystemClock};
pub use error::CollaboratorError;
pub use governance::GovernanceActionSink;
pub use ledger::{JobLedger, JobParties, ReleaseRequest};
pub use token::FeeToken;
pub use voting_power::VotingPowerSource;
