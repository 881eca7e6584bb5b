//! Events emitted by the engine for off-chain observers.

use crate::question::QuestionStatus;
use crate::settlement::ReleaseBreakdown;
use crate::skill_verification::SkillStatus;
use athena_oracle::OracleEvent;
use athena_types::{Address, ApplicationId, DisputeId, JobId, QuestionId};
use athena_voting::WeightSource;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AthenaEvent {
    /// Forwarded from the oracle registry.
    Oracle(OracleEvent),

    AuthorityChanged {
        role: String,
        address: Option<Address>,
    },
    MaliciousMemberReported {
        oracle: String,
        member: Address,
        reporter: Address,
        slashed: u128,
        forced_out: bool,
    },

    // ── Disputes ────────────────────────────────────────────────────────
    DisputeRaised {
        id: DisputeId,
        job_id: JobId,
        initiator: Address,
        oracle: String,
        locked_amount: u128,
        required_votes: u32,
        fee: u128,
    },
    EvidenceSubmitted {
        id: DisputeId,
        by: Address,
        evidence_ref: String,
    },
    DisputeVoteCast {
        id: DisputeId,
        voter: Address,
        in_favor: bool,
        weight: u128,
        source: WeightSource,
    },
    DisputeResolved {
        id: DisputeId,
        recipient: Address,
        resolved_by: Address,
    },
    DisputeEscalated {
        id: DisputeId,
        by: Address,
    },
    DisputedAmountClaimed {
        id: DisputeId,
        recipient: Address,
        breakdown: ReleaseBreakdown,
    },
    DisputeFeeRefunded {
        id: DisputeId,
        to: Address,
        amount: u128,
    },
    DisputeFeeRewardClaimed {
        id: DisputeId,
        voter: Address,
        amount: u128,
    },

    // ── Skill verification ──────────────────────────────────────────────
    SkillApplicationSubmitted {
        id: ApplicationId,
        applicant: Address,
        oracle: String,
    },
    SkillApplicationVoteCast {
        id: ApplicationId,
        voter: Address,
        in_favor: bool,
        weight: u128,
    },
    SkillApplicationFinalized {
        id: ApplicationId,
        status: SkillStatus,
    },

    // ── Questions ───────────────────────────────────────────────────────
    QuestionAsked {
        id: QuestionId,
        asker: Address,
        oracle: String,
    },
    QuestionVoteCast {
        id: QuestionId,
        voter: Address,
        in_favor: bool,
        weight: u128,
    },
    QuestionFinalized {
        id: QuestionId,
        status: QuestionStatus,
    },

    /// A vote earned a participation credit. `sink` is `None` when every
    /// recorder failed.
    GovernanceActionRecorded {
        who: Address,
        sink: Option<String>,
    },
}
