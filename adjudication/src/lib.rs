//! Adjudication for the Athena engine.
//!
//! - Disputes: raised by a job party against an active oracle, voted on by
//!   oracle members and DAO voters, resolved explicitly, then settled.
//! - Skill-verification applications and questions: voted on by oracle
//!   members only, finalized automatically on a quorum majority.
//! - `AthenaEngine` ties these to the oracle registry and the external
//!   collaborators, and gates every privileged call through an ordered
//!   authorization chain.

pub mod authority;
pub mod dispute;
pub mod engine;
pub mod error;
pub mod events;
pub mod guard;
pub mod question;
pub mod recorder;
pub mod settlement;
pub mod skill_verification;

pub use authority::{AuthorityChain, AuthorityConfig, Capability};
pub use dispute::{Dispute, DisputeDetails, DisputeStatus, DisputeVotes, EvidenceEntry};
pub use engine::{AthenaEngine, Collaborators, DecisionRef, EngineSnapshot};
pub use error::AdjudicationError;
pub use events::AthenaEvent;
pub use guard::{TransferGuard, TransferLock};
pub use question::{Question, QuestionStatus};
pub use recorder::RecorderChain;
pub use settlement::{ReleaseBreakdown, RewardShare};
pub use skill_verification::{SkillApplication, SkillStatus};
