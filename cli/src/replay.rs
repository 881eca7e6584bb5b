//! Replay a JSON operation script against an in-memory engine.
//!
//! The script is a JSON array of objects tagged by `"op"`. Collaborators are
//! the nullable implementations, seeded by the script itself (`seed_job`,
//! `set_voting_power`, `mint`, ...). Every event the engine emits is written
//! as one JSON line. The first failing operation stops the replay.
//!
//! Amounts in scripts are 64-bit; the engine widens them.

use athena_adjudication::{AdjudicationError, AthenaEngine, AthenaEvent, Collaborators, RecorderChain};
use athena_nullables::{NullClock, NullFeeToken, NullGovernanceSink, NullJobLedger, NullVotingPower};
use athena_types::{Address, ApplicationId, DisputeId, EngineParams, ErrorKind, JobId, QuestionId};
use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    // ── Collaborator seeding ────────────────────────────────────────────
    SeedJob {
        job: String,
        client: Address,
        freelancer: Address,
        escrow: u64,
    },
    SetVotingPower {
        who: Address,
        power: u64,
    },
    SetGovernanceEligible {
        who: Address,
        eligible: bool,
    },
    Mint {
        to: Address,
        amount: u64,
    },
    AdvanceClock {
        secs: u64,
    },

    // ── Registry and authority ──────────────────────────────────────────
    RegisterSkill {
        caller: Address,
        name: String,
        #[serde(default)]
        evidence_ref: String,
        required_stake: u64,
    },
    AddOracleMembers {
        caller: Address,
        oracle: String,
        members: Vec<Address>,
        stakes: Vec<u64>,
    },
    RemoveOracleMember {
        caller: Address,
        oracle: String,
        member: Address,
    },
    UpdateMemberStake {
        caller: Address,
        oracle: String,
        member: Address,
        stake: u64,
    },
    RemoveStake {
        caller: Address,
        oracle: String,
        member: Address,
        penalty: u64,
    },
    ReportMaliciousMember {
        caller: Address,
        oracle: String,
        member: Address,
        penalty: u64,
    },
    RemoveOracles {
        caller: Address,
        names: Vec<String>,
    },
    CompactMembers {
        caller: Address,
        oracle: String,
    },
    SetMinOracleMembers {
        caller: Address,
        value: u32,
    },
    SetMinStake {
        caller: Address,
        value: u64,
    },
    SetDisputeFee {
        caller: Address,
        value: u64,
    },
    SetVotingPeriod {
        caller: Address,
        secs: u64,
    },
    SetPlatformFeeBps {
        caller: Address,
        bps: u32,
    },
    SetDisputeQuorum {
        caller: Address,
        min_votes: u32,
        quorum_bps: u32,
    },
    SetGovernanceContract {
        caller: Address,
        contract: Option<Address>,
    },
    SetLegacyDao {
        caller: Address,
        dao: Option<Address>,
    },
    TransferOwnership {
        caller: Address,
        new_owner: Address,
    },

    // ── Disputes ────────────────────────────────────────────────────────
    RaiseDispute {
        caller: Address,
        job: String,
        #[serde(default)]
        reason_ref: String,
        oracle: String,
        fee: u64,
    },
    SubmitEvidence {
        caller: Address,
        dispute: u64,
        evidence_ref: String,
    },
    VoteOnDispute {
        caller: Address,
        dispute: u64,
        in_favor: bool,
        #[serde(default)]
        reason_ref: String,
    },
    ResolveDispute {
        caller: Address,
        dispute: u64,
        recipient: Address,
    },
    EscalateDispute {
        caller: Address,
        dispute: u64,
    },
    ClaimDisputedAmount {
        caller: Address,
        dispute: u64,
    },
    ClaimDisputeFeeRefund {
        caller: Address,
        dispute: u64,
    },
    ClaimDisputeFeeReward {
        caller: Address,
        dispute: u64,
    },

    // ── Skill verification and questions ───────────────────────────────
    SubmitSkillApplication {
        caller: Address,
        payload_ref: String,
        oracle: String,
    },
    VoteOnSkillApplication {
        caller: Address,
        application: u64,
        in_favor: bool,
        #[serde(default)]
        reason_ref: String,
    },
    AskQuestion {
        caller: Address,
        question_ref: String,
        oracle: String,
    },
    VoteOnQuestion {
        caller: Address,
        question: u64,
        in_favor: bool,
        #[serde(default)]
        reason_ref: String,
    },
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("step {step} failed ({kind}): {source}")]
    Step {
        step: usize,
        kind: ErrorKind,
        #[source]
        source: AdjudicationError,
    },

    #[error("invalid script: {0}")]
    Script(#[from] serde_json::Error),

    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Serialize)]
struct EventLine<'a> {
    step: usize,
    event: &'a AthenaEvent,
}

pub fn parse_script(json: &str) -> Result<Vec<Op>, ReplayError> {
    Ok(serde_json::from_str(json)?)
}

/// An engine wired to nullable collaborators, plus handles to seed them.
pub struct Replayer {
    engine: AthenaEngine,
    ledger: NullJobLedger,
    power: NullVotingPower,
    token: NullFeeToken,
    clock: NullClock,
}

impl Replayer {
    pub fn new(owner: Address, params: EngineParams, start_time: u64) -> Self {
        let ledger = NullJobLedger::new();
        let power = NullVotingPower::new();
        let token = NullFeeToken::new();
        let clock = NullClock::new(start_time);
        let recorders = RecorderChain::new()
            .with_sink(Box::new(NullGovernanceSink::new("tracker")))
            .with_sink(Box::new(NullGovernanceSink::new("native-governance")))
            .with_sink(Box::new(NullGovernanceSink::new("legacy-dao")));
        let collaborators = Collaborators::new(
            Box::new(ledger.clone()),
            Box::new(power.clone()),
            Box::new(token.clone()),
        )
        .with_clock(Box::new(clock.clone()))
        .with_recorders(recorders);

        Self {
            engine: AthenaEngine::new(owner, params, collaborators),
            ledger,
            power,
            token,
            clock,
        }
    }

    pub fn engine(&self) -> &AthenaEngine {
        &self.engine
    }

    /// Run every op in order, writing events to `out`. Returns the number of
    /// events written.
    pub fn run(&mut self, ops: &[Op], out: &mut impl Write) -> Result<usize, ReplayError> {
        let mut written = 0;
        for (step, op) in ops.iter().enumerate() {
            debug!(step, ?op, "replaying");
            let applied = self.apply(op);
            // Events from a failed step are still flushed.
            for event in self.engine.drain_events() {
                serde_json::to_writer(&mut *out, &EventLine { step, event: &event })?;
                writeln!(out)?;
                written += 1;
            }
            applied.map_err(|source| ReplayError::Step {
                step,
                kind: source.kind(),
                source,
            })?;
        }
        Ok(written)
    }

    pub fn apply(&mut self, op: &Op) -> Result<(), AdjudicationError> {
        let engine = &mut self.engine;
        match op {
            Op::SeedJob {
                job,
                client,
                freelancer,
                escrow,
            } => self.ledger.add_job(&JobId::new(job.as_str()), client, freelancer, (*escrow).into()),
            Op::SetVotingPower { who, power } => self.power.set_power(who, (*power).into()),
            Op::SetGovernanceEligible { who, eligible } => {
                self.power.set_governance_eligible(who, *eligible)
            }
            Op::Mint { to, amount } => self.token.mint(to, (*amount).into()),
            Op::AdvanceClock { secs } => self.clock.advance(*secs),

            Op::RegisterSkill {
                caller,
                name,
                evidence_ref,
                required_stake,
            } => engine.register_skill(caller, name, evidence_ref, (*required_stake).into())?,
            Op::AddOracleMembers {
                caller,
                oracle,
                members,
                stakes,
            } => {
                let stakes: Vec<u128> = stakes.iter().map(|s| u128::from(*s)).collect();
                engine.add_oracle_members(caller, oracle, members, &stakes)?
            }
            Op::RemoveOracleMember {
                caller,
                oracle,
                member,
            } => {
                engine.remove_oracle_member(caller, oracle, member)?;
            }
            Op::UpdateMemberStake {
                caller,
                oracle,
                member,
                stake,
            } => engine.update_member_stake(caller, oracle, member, (*stake).into())?,
            Op::RemoveStake {
                caller,
                oracle,
                member,
                penalty,
            } => {
                engine.remove_stake(caller, oracle, member, (*penalty).into())?;
            }
            Op::ReportMaliciousMember {
                caller,
                oracle,
                member,
                penalty,
            } => {
                engine.report_malicious_member(caller, oracle, member, (*penalty).into())?;
            }
            Op::RemoveOracles { caller, names } => engine.remove_oracles(caller, names)?,
            Op::CompactMembers { caller, oracle } => {
                engine.compact_members(caller, oracle)?;
            }
            Op::SetMinOracleMembers { caller, value } => {
                engine.set_min_oracle_members(caller, *value)?
            }
            Op::SetMinStake { caller, value } => engine.set_min_stake(caller, (*value).into())?,
            Op::SetDisputeFee { caller, value } => engine.set_dispute_fee(caller, (*value).into())?,
            Op::SetVotingPeriod { caller, secs } => engine.set_voting_period(caller, *secs)?,
            Op::SetPlatformFeeBps { caller, bps } => engine.set_platform_fee_bps(caller, *bps)?,
            Op::SetDisputeQuorum {
                caller,
                min_votes,
                quorum_bps,
            } => engine.set_dispute_quorum(caller, *min_votes, *quorum_bps)?,
            Op::SetGovernanceContract { caller, contract } => {
                engine.set_governance_contract(caller, contract.clone())?
            }
            Op::SetLegacyDao { caller, dao } => engine.set_legacy_dao(caller, dao.clone())?,
            Op::TransferOwnership { caller, new_owner } => {
                engine.transfer_ownership(caller, new_owner)?
            }

            Op::RaiseDispute {
                caller,
                job,
                reason_ref,
                oracle,
                fee,
            } => {
                engine.raise_dispute(
                    caller,
                    &JobId::new(job.as_str()),
                    reason_ref,
                    oracle,
                    (*fee).into(),
                )?;
            }
            Op::SubmitEvidence {
                caller,
                dispute,
                evidence_ref,
            } => engine.submit_evidence(caller, DisputeId::new(*dispute), evidence_ref)?,
            Op::VoteOnDispute {
                caller,
                dispute,
                in_favor,
                reason_ref,
            } => {
                engine.vote_on_dispute(caller, DisputeId::new(*dispute), *in_favor, reason_ref)?;
            }
            Op::ResolveDispute {
                caller,
                dispute,
                recipient,
            } => engine.resolve_dispute(caller, DisputeId::new(*dispute), recipient)?,
            Op::EscalateDispute { caller, dispute } => {
                engine.escalate_dispute(caller, DisputeId::new(*dispute))?
            }
            Op::ClaimDisputedAmount { caller, dispute } => {
                engine.claim_disputed_amount(caller, DisputeId::new(*dispute))?;
            }
            Op::ClaimDisputeFeeRefund { caller, dispute } => {
                engine.claim_dispute_fee_refund(caller, DisputeId::new(*dispute))?;
            }
            Op::ClaimDisputeFeeReward { caller, dispute } => {
                engine.claim_dispute_fee_reward(caller, DisputeId::new(*dispute))?;
            }

            Op::SubmitSkillApplication {
                caller,
                payload_ref,
                oracle,
            } => {
                engine.submit_skill_application(caller, payload_ref, oracle)?;
            }
            Op::VoteOnSkillApplication {
                caller,
                application,
                in_favor,
                reason_ref,
            } => {
                engine.vote_on_skill_application(
                    caller,
                    ApplicationId::new(*application),
                    *in_favor,
                    reason_ref,
                )?;
            }
            Op::AskQuestion {
                caller,
                question_ref,
                oracle,
            } => {
                engine.ask_question(caller, question_ref, oracle)?;
            }
            Op::VoteOnQuestion {
                caller,
                question,
                in_favor,
                reason_ref,
            } => {
                engine.vote_on_question(caller, QuestionId::new(*question), *in_favor, reason_ref)?;
            }
        }
        Ok(())
    }
}
