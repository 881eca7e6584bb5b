//! Dispute records and their life cycle.
//!
//! ```text
//! Created ──evidence──▶ UnderReview
//!    │                      │
//!    └──────first vote──────┴──▶ InDeliberation ──resolve──▶ Resolved
//!                                      │
//!          (any but Resolved/Escalated)└──escalate──▶ Escalated ──resolve──▶ Resolved
//! ```
//!
//! Votes never finalize a dispute. Resolution is always an explicit,
//! separately authorized call.

use athena_types::{Address, DisputeId, JobId, Timestamp};
use athena_voting::{
    BallotBook, Decision, ExplicitResolution, FinalizationRule, Verdict, VoterPolicy,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisputeStatus {
    Created,
    UnderReview,
    InDeliberation,
    Resolved,
    Escalated,
}

impl DisputeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::UnderReview => "under-review",
            Self::InDeliberation => "in-deliberation",
            Self::Resolved => "resolved",
            Self::Escalated => "escalated",
        }
    }

    pub fn accepts_votes(&self) -> bool {
        matches!(self, Self::Created | Self::UnderReview | Self::InDeliberation)
    }

    pub fn accepts_evidence(&self) -> bool {
        *self != Self::Resolved
    }

    pub fn can_escalate(&self) -> bool {
        !matches!(self, Self::Resolved | Self::Escalated)
    }
}

impl fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceEntry {
    pub submitted_by: Address,
    pub evidence_ref: String,
    pub submitted_at: Timestamp,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Dispute {
    pub id: DisputeId,
    pub job_id: JobId,
    pub initiator: Address,
    pub respondent: Address,
    pub reason_ref: String,
    pub status: DisputeStatus,
    pub assigned_oracle: String,
    /// Oracle member count at creation, scaled by the dispute quorum.
    pub required_votes: u32,
    pub oracle_validated: bool,
    /// Escrow locked at creation; authoritative for payout.
    pub locked_amount: u128,
    /// Dispute fee collected from the initiator.
    pub fee: u128,
    pub result_determined: bool,
    pub recipient: Option<Address>,
    /// One-shot latch: once set, no further payout is possible.
    pub funds_released: bool,
    pub refund_claimed: bool,
    pub reward_claims: BTreeSet<Address>,
    pub evidence: Vec<EvidenceEntry>,
    pub ballots: BallotBook,
    pub opened_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

impl Dispute {
    pub fn is_party(&self, who: &Address) -> bool {
        *who == self.initiator || *who == self.respondent
    }

    /// The party that lost, once a recipient is set.
    pub fn loser(&self) -> Option<&Address> {
        let recipient = self.recipient.as_ref()?;
        if *recipient == self.initiator {
            Some(&self.respondent)
        } else {
            Some(&self.initiator)
        }
    }

    /// The ballot choice that sided with the recipient. A vote "for" is a
    /// vote for the initiator.
    pub fn winning_choice(&self) -> Option<bool> {
        self.recipient.as_ref().map(|r| *r == self.initiator)
    }

    pub fn details(&self) -> DisputeDetails {
        DisputeDetails {
            id: self.id,
            job_id: self.job_id.clone(),
            initiator: self.initiator.clone(),
            respondent: self.respondent.clone(),
            reason_ref: self.reason_ref.clone(),
            status: self.status,
            assigned_oracle: self.assigned_oracle.clone(),
            required_votes: self.required_votes,
            oracle_validated: self.oracle_validated,
            locked_amount: self.locked_amount,
            fee: self.fee,
            result_determined: self.result_determined,
            recipient: self.recipient.clone(),
            funds_released: self.funds_released,
            evidence_count: self.evidence.len(),
            opened_at: self.opened_at,
        }
    }

    pub fn votes(&self) -> DisputeVotes {
        let tally = self.ballots.tally();
        DisputeVotes {
            id: self.id,
            votes_for: tally.for_weight,
            votes_against: tally.against_weight,
            for_count: tally.for_count,
            against_count: tally.against_count,
            required_votes: self.required_votes,
            quorum_reached: tally.head_count() >= self.required_votes,
        }
    }
}

impl Decision for Dispute {
    fn label(&self) -> String {
        self.id.to_string()
    }

    fn oracle(&self) -> &str {
        &self.assigned_oracle
    }

    fn is_open(&self) -> bool {
        self.status.accepts_votes()
    }

    fn status_label(&self) -> String {
        self.status.to_string()
    }

    fn voter_policy(&self) -> VoterPolicy {
        VoterPolicy::MembersOrVotingPower
    }

    fn rule(&self) -> &dyn FinalizationRule {
        &ExplicitResolution
    }

    fn ballots(&self) -> &BallotBook {
        &self.ballots
    }

    fn ballots_mut(&mut self) -> &mut BallotBook {
        &mut self.ballots
    }

    fn begin_deliberation(&mut self) {
        self.status = DisputeStatus::InDeliberation;
    }

    fn finalize(&mut self, _verdict: Verdict) {}
}

/// Read-only view returned by `get_dispute_details`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeDetails {
    pub id: DisputeId,
    pub job_id: JobId,
    pub initiator: Address,
    pub respondent: Address,
    pub reason_ref: String,
    pub status: DisputeStatus,
    pub assigned_oracle: String,
    pub required_votes: u32,
    pub oracle_validated: bool,
    pub locked_amount: u128,
    pub fee: u128,
    pub result_determined: bool,
    pub recipient: Option<Address>,
    pub funds_released: bool,
    pub evidence_count: usize,
    pub opened_at: Timestamp,
}

/// Read-only view returned by `get_dispute_votes`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeVotes {
    pub id: DisputeId,
    pub votes_for: u128,
    pub votes_against: u128,
    pub for_count: u32,
    pub against_count: u32,
    pub required_votes: u32,
    pub quorum_reached: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispute() -> Dispute {
        Dispute {
            id: DisputeId::FIRST,
            job_id: JobId::new("job-1"),
            initiator: Address::new("0xc1"),
            respondent: Address::new("0xf1"),
            reason_ref: "ipfs://reason".into(),
            status: DisputeStatus::Created,
            assigned_oracle: "welding".into(),
            required_votes: 3,
            oracle_validated: true,
            locked_amount: 1_000,
            fee: 50,
            result_determined: false,
            recipient: None,
            funds_released: false,
            refund_claimed: false,
            reward_claims: BTreeSet::new(),
            evidence: Vec::new(),
            ballots: BallotBook::default(),
            opened_at: Timestamp::new(0),
            resolved_at: None,
        }
    }

    #[test]
    fn status_gates() {
        assert!(DisputeStatus::Created.accepts_votes());
        assert!(!DisputeStatus::Escalated.accepts_votes());
        assert!(!DisputeStatus::Resolved.accepts_votes());
        assert!(DisputeStatus::Escalated.accepts_evidence());
        assert!(!DisputeStatus::Resolved.accepts_evidence());
        assert!(DisputeStatus::InDeliberation.can_escalate());
        assert!(!DisputeStatus::Escalated.can_escalate());
    }

    #[test]
    fn winning_side_follows_recipient() {
        let mut d = dispute();
        assert_eq!(d.winning_choice(), None);
        d.recipient = Some(d.initiator.clone());
        assert_eq!(d.winning_choice(), Some(true));
        assert_eq!(d.loser(), Some(&Address::new("0xf1")));
        d.recipient = Some(d.respondent.clone());
        assert_eq!(d.winning_choice(), Some(false));
        assert_eq!(d.loser(), Some(&Address::new("0xc1")));
    }

    #[test]
    fn explicit_rule_never_finalizes() {
        let d = dispute();
        let tally = athena_voting::Tally {
            for_weight: 100,
            against_weight: 0,
            for_count: 10,
            against_count: 0,
        };
        assert_eq!(d.rule().evaluate(&tally, 3), Verdict::Pending);
    }
}
