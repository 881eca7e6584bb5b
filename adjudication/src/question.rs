//! Free-form questions put to an oracle. Same voting shape as skill
//! applications: members only, auto-finalizing on quorum majority.

use athena_types::{Address, QuestionId, Timestamp};
use athena_voting::{
    BallotBook, Decision, FinalizationRule, QuorumMajority, Verdict, VoterPolicy,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionStatus {
    Pending,
    UnderReview,
    Answered,
    Rejected,
}

impl QuestionStatus {
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Answered | Self::Rejected)
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::UnderReview => "under-review",
            Self::Answered => "answered",
            Self::Rejected => "rejected",
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub asker: Address,
    pub question_ref: String,
    pub assigned_oracle: String,
    pub status: QuestionStatus,
    pub ballots: BallotBook,
    pub opened_at: Timestamp,
}

impl Decision for Question {
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
        self.status = QuestionStatus::UnderReview;
    }

    fn finalize(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Approved => self.status = QuestionStatus::Answered,
            Verdict::Rejected => self.status = QuestionStatus::Rejected,
            Verdict::Pending => {}
        }
    }
}
