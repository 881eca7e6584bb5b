//! Skill-verification applications.
//!
//! An applicant asks an active oracle to verify a skill claim. Only active
//! members of that oracle vote, and the application finalizes itself as
//! soon as the quorum-majority rule yields a verdict.

use athena_types::{Address, ApplicationId, Timestamp};
use athena_voting::{
    BallotBook, Decision, FinalizationRule, QuorumMajority, Verdict, VoterPolicy,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillStatus {
    Pending,
    UnderReview,
    Verified,
    Rejected,
}

impl SkillStatus {
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Verified | Self::Rejected)
    }
}

impl fmt::Display for SkillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::UnderReview => "under-review",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkillApplication {
    pub id: ApplicationId,
    pub applicant: Address,
    pub payload_ref: String,
    pub assigned_oracle: String,
    pub status: SkillStatus,
    pub ballots: BallotBook,
    pub opened_at: Timestamp,
}

impl SkillApplication {
    pub fn votes_for(&self) -> u128 {
        self.ballots.tally().for_weight
    }

    pub fn votes_against(&self) -> u128 {
        self.ballots.tally().against_weight
    }
}

impl Decision for SkillApplication {
    fn label(&self) -> String {
        self.id.to_string()
    }

    fn oracle(&self) -> &str {
        &self.assigned_oracle
    }

    fn is_open(&self) -> bool {
        !self.status.is_final()
    }

    fn status_label(&self) -> String {
        self.status.to_string()
    }

    fn voter_policy(&self) -> VoterPolicy {
        VoterPolicy::OracleMembersOnly
    }

    fn rule(&self) -> &dyn FinalizationRule {
        &QuorumMajority
    }

    fn ballots(&self) -> &BallotBook {
        &self.ballots
    }

    fn ballots_mut(&mut self) -> &mut BallotBook {
        &mut self.ballots
    }

    fn begin_deliberation(&mut self) {
        self.status = SkillStatus::UnderReview;
    }

    fn finalize(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Approved => self.status = SkillStatus::Verified,
            Verdict::Rejected => self.status = SkillStatus::Rejected,
            Verdict::Pending => {}
        }
    }
}
