//! Dispute-grade policy: decides whether an oracle may adjudicate
//! monetary disputes.
//!
//! The default bar is the activation bar, which makes the check equal to
//! `is_active`. It stays a separate, swappable policy so that a stricter
//! dispute threshold can be introduced without touching the call sites.

use crate::skill::Oracle;
use athena_types::EngineParams;

/// Decides whether an oracle is fit to adjudicate monetary disputes.
pub trait DisputeGradePolicy: Send + Sync {
    /// Human-readable policy name, used in logs.
    fn name(&self) -> &str;

    fn is_dispute_grade(&self, oracle: &Oracle, params: &EngineParams) -> bool;
}

/// Active and at least `min_oracle_members` members.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActivationBarPolicy;

impl DisputeGradePolicy for ActivationBarPolicy {
    fn name(&self) -> &str {
        "activation-bar"
    }

    fn is_dispute_grade(&self, oracle: &Oracle, params: &EngineParams) -> bool {
        oracle.is_active && oracle.member_count >= params.min_oracle_members
    }
}

/// The activation bar plus a fixed, higher member count.
#[derive(Clone, Copy, Debug)]
pub struct MinimumMembersPolicy {
    pub min_members: u32,
}

impl DisputeGradePolicy for MinimumMembersPolicy {
    fn name(&self) -> &str {
        "minimum-members"
    }

    fn is_dispute_grade(&self, oracle: &Oracle, params: &EngineParams) -> bool {
        ActivationBarPolicy.is_dispute_grade(oracle, params) && oracle.member_count >= self.min_members
    }
}
