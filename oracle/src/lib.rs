//! Oracle registry for the Athena adjudication engine.
//!
//! An oracle is a stake-gated committee of identities attached to one skill
//! topic. It becomes active once it has `min_oracle_members` members and
//! drops back to inactive as soon as it falls below that count; nobody
//! approves the transition separately.
//!
//! The registry also owns the engine parameters (minimum stake, minimum
//! members, fees, voting period) and hands them out by value.

pub mod error;
pub mod member;
pub mod policy;
pub mod registry;
pub mod skill;

pub use error::OracleError;
pub use member::{MembershipList, OracleMember};
pub use policy::{ActivationBarPolicy, DisputeGradePolicy, MinimumMembersPolicy};
pub use registry::{OracleEvent, OracleRegistry, RegistryState, StakePenalty};
pub use skill::{Oracle, OracleDetails, Skill};
