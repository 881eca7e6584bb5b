//! Skills and the oracles that adjudicate them.

use crate::member::MembershipList;
use athena_types::Timestamp;
use serde::{Deserialize, Serialize};

/// A registered skill topic. The name is the primary key and never changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    /// Description or evidence URI supplied at registration.
    pub evidence_ref: String,
    /// Stake each member of this skill's oracle must bond.
    pub required_stake: u128,
    pub registered_at: Timestamp,
}

/// The committee that adjudicates one skill, keyed by the skill name.
///
/// `total_staked` is always the sum of the active members' stakes, and
/// `is_active` always equals `member_count >= min_oracle_members` for the
/// parameters in force.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Oracle {
    pub name: String,
    pub is_active: bool,
    pub total_staked: u128,
    pub member_count: u32,
    pub members: MembershipList,
}

impl Oracle {
    /// A fresh, inactive oracle with no members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_active: false,
            total_staked: 0,
            member_count: 0,
            members: MembershipList::default(),
        }
    }
}

/// Read-only view returned by `get_oracle_details`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleDetails {
    pub name: String,
    pub evidence_ref: String,
    pub required_stake: u128,
    pub is_active: bool,
    pub total_staked: u128,
    pub member_count: u32,
    /// Active members in membership-list order.
    pub members: Vec<athena_types::Address>,
}
