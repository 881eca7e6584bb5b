//! The Athena engine: single owner of registry, disputes, applications and
//! questions, and the only writer of their state.
//!
//! Every entry point takes the calling identity explicitly, copies the
//! engine parameters by value before doing anything else, validates
//! completely, and only then mutates. Collaborator failures on mandatory
//! paths (escrow, fee token) abort the call; governance recording never does.
//!
//! Events accumulate in `pending_events` until the caller drains them.

mod admin;
mod claims;
mod disputes;
mod snapshot;
mod verification;

pub use snapshot::EngineSnapshot;

use crate::authority::{AuthContext, AuthorityChain, AuthorityConfig, Capability};
use crate::dispute::{Dispute, DisputeDetails, DisputeVotes};
use crate::events::AthenaEvent;
use crate::guard::TransferLock;
use crate::question::Question;
use crate::recorder::RecorderChain;
use crate::skill_verification::SkillApplication;
use crate::AdjudicationError;
use athena_collaborators::{Clock, FeeToken, JobLedger, SystemClock, VotingPowerSource};
use athena_oracle::{OracleDetails, OracleRegistry};
use athena_types::{
    Address, ApplicationId, DisputeId, EngineParams, JobId, QuestionId, Timestamp,
};
use athena_voting::StakeWeightedVoting;
use std::collections::BTreeMap;
use tracing::debug;

/// Everything outside the engine's own records.
pub struct Collaborators {
    pub ledger: Box<dyn JobLedger>,
    pub voting_power: Box<dyn VotingPowerSource>,
    pub fee_token: Box<dyn FeeToken>,
    pub clock: Box<dyn Clock>,
    pub recorders: RecorderChain,
}

impl Collaborators {
    /// Wire the mandatory collaborators; wall-clock time, no recorders.
    pub fn new(
        ledger: Box<dyn JobLedger>,
        voting_power: Box<dyn VotingPowerSource>,
        fee_token: Box<dyn FeeToken>,
    ) -> Self {
        Self {
            ledger,
            voting_power,
            fee_token,
            clock: Box::new(SystemClock),
            recorders: RecorderChain::new(),
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_recorders(mut self, recorders: RecorderChain) -> Self {
        self.recorders = recorders;
        self
    }
}

/// Identifies any votable decision, for deadline queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecisionRef {
    Dispute(DisputeId),
    Application(ApplicationId),
    Question(QuestionId),
}

pub struct AthenaEngine {
    registry: OracleRegistry,
    authority: AuthorityConfig,
    disputes: BTreeMap<DisputeId, Dispute>,
    /// Latest dispute raised per job.
    job_disputes: BTreeMap<JobId, DisputeId>,
    applications: BTreeMap<ApplicationId, SkillApplication>,
    questions: BTreeMap<QuestionId, Question>,
    next_dispute_id: DisputeId,
    next_application_id: ApplicationId,
    next_question_id: QuestionId,
    collaborators: Collaborators,
    transfer_lock: TransferLock,
    voting: StakeWeightedVoting,
    pending_events: Vec<AthenaEvent>,
}

impl AthenaEngine {
    pub fn new(owner: Address, params: EngineParams, collaborators: Collaborators) -> Self {
        Self {
            registry: OracleRegistry::new(params),
            authority: AuthorityConfig::new(owner),
            disputes: BTreeMap::new(),
            job_disputes: BTreeMap::new(),
            applications: BTreeMap::new(),
            questions: BTreeMap::new(),
            next_dispute_id: DisputeId::FIRST,
            next_application_id: ApplicationId::FIRST,
            next_question_id: QuestionId::FIRST,
            collaborators,
            transfer_lock: TransferLock::new(),
            voting: StakeWeightedVoting,
            pending_events: Vec::new(),
        }
    }

    /// Take every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<AthenaEvent> {
        self.forward_registry_events();
        std::mem::take(&mut self.pending_events)
    }

    /// A handle on the transfer lock. Holding a guard from it makes every
    /// transfer-triggering entry point fail with `Reentrant`.
    pub fn transfer_lock(&self) -> TransferLock {
        self.transfer_lock.clone()
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn params(&self) -> EngineParams {
        self.registry.params()
    }

    pub fn registry(&self) -> &OracleRegistry {
        &self.registry
    }

    pub fn authority(&self) -> &AuthorityConfig {
        &self.authority
    }

    pub fn get_oracle_details(&self, oracle: &str) -> Result<OracleDetails, AdjudicationError> {
        Ok(self.registry.oracle_details(oracle)?)
    }

    pub fn is_oracle_active(&self, oracle: &str) -> bool {
        self.registry.is_oracle_active(oracle)
    }

    pub fn validate_oracle_for_disputes(&self, oracle: &str) -> bool {
        self.registry.validate_oracle_for_disputes(oracle)
    }

    pub fn is_oracle_member(&self, oracle: &str, member: &Address) -> bool {
        self.registry.is_oracle_member(oracle, member)
    }

    pub fn oracle_member_count(&self, oracle: &str) -> u32 {
        self.registry.member_count(oracle)
    }

    pub fn oracle_member_stake(&self, oracle: &str, member: &Address) -> u128 {
        self.registry.member_stake(oracle, member)
    }

    pub fn get_dispute(&self, id: DisputeId) -> Result<&Dispute, AdjudicationError> {
        self.disputes
            .get(&id)
            .ok_or(AdjudicationError::DisputeNotFound(id))
    }

    pub fn get_dispute_details(&self, id: DisputeId) -> Result<DisputeDetails, AdjudicationError> {
        Ok(self.get_dispute(id)?.details())
    }

    pub fn get_dispute_votes(&self, id: DisputeId) -> Result<DisputeVotes, AdjudicationError> {
        Ok(self.get_dispute(id)?.votes())
    }

    pub fn dispute_count(&self) -> usize {
        self.disputes.len()
    }

    pub fn get_skill_application(
        &self,
        id: ApplicationId,
    ) -> Result<&SkillApplication, AdjudicationError> {
        self.applications
            .get(&id)
            .ok_or(AdjudicationError::ApplicationNotFound(id))
    }

    pub fn get_question(&self, id: QuestionId) -> Result<&Question, AdjudicationError> {
        self.questions
            .get(&id)
            .ok_or(AdjudicationError::QuestionNotFound(id))
    }

    /// When voting on `decision` is meant to close. Informational only.
    pub fn voting_deadline(&self, decision: DecisionRef) -> Result<Timestamp, AdjudicationError> {
        Ok(self
            .opened_at(decision)?
            .plus_secs(self.params().voting_period_secs))
    }

    /// Whether the voting period of `decision` has passed at `now`.
    /// Nothing in the engine acts on this.
    pub fn is_voting_expired(
        &self,
        decision: DecisionRef,
        now: Timestamp,
    ) -> Result<bool, AdjudicationError> {
        Ok(self
            .opened_at(decision)?
            .has_expired(self.params().voting_period_secs, now))
    }

    fn opened_at(&self, decision: DecisionRef) -> Result<Timestamp, AdjudicationError> {
        Ok(match decision {
            DecisionRef::Dispute(id) => self.get_dispute(id)?.opened_at,
            DecisionRef::Application(id) => self.get_skill_application(id)?.opened_at,
            DecisionRef::Question(id) => self.get_question(id)?.opened_at,
        })
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn now(&self) -> Timestamp {
        self.collaborators.clock.now()
    }

    fn require(&self, capability: Capability, caller: &Address) -> Result<(), AdjudicationError> {
        let ctx = AuthContext {
            config: &self.authority,
            voting_power: self.collaborators.voting_power.as_ref(),
        };
        match AuthorityChain::for_capability(capability).authorize(caller, &ctx) {
            Some(strategy) => {
                debug!(%caller, strategy, capability = capability.as_str(), "caller authorized");
                Ok(())
            }
            None => Err(AdjudicationError::Unauthorized {
                action: capability.as_str(),
                caller: caller.to_string(),
            }),
        }
    }

    fn require_owner(&self, caller: &Address) -> Result<(), AdjudicationError> {
        if *caller != self.authority.owner {
            return Err(AdjudicationError::NotOwner {
                caller: caller.to_string(),
            });
        }
        Ok(())
    }

    fn forward_registry_events(&mut self) {
        self.pending_events
            .extend(self.registry.drain_events().into_iter().map(AthenaEvent::Oracle));
    }

    /// Best-effort participation credit for a voter.
    fn record_participation(&mut self, who: &Address) {
        let sink = self.collaborators.recorders.record(who);
        self.pending_events.push(AthenaEvent::GovernanceActionRecorded {
            who: who.clone(),
            sink,
        });
    }
}
