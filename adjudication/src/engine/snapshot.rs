//! Whole-engine persistence via bincode.

use super::{AthenaEngine, Collaborators};
use crate::authority::AuthorityConfig;
use crate::dispute::Dispute;
use crate::guard::TransferLock;
use crate::question::Question;
use crate::skill_verification::SkillApplication;
use crate::AdjudicationError;
use athena_oracle::{ActivationBarPolicy, OracleRegistry, RegistryState};
use athena_types::{ApplicationId, DisputeId, JobId, QuestionId};
use athena_voting::StakeWeightedVoting;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Everything the engine owns, minus collaborators and pending events.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub registry: RegistryState,
    pub authority: AuthorityConfig,
    pub disputes: BTreeMap<DisputeId, Dispute>,
    pub job_disputes: BTreeMap<JobId, DisputeId>,
    pub applications: BTreeMap<ApplicationId, SkillApplication>,
    pub questions: BTreeMap<QuestionId, Question>,
    pub next_dispute_id: DisputeId,
    pub next_application_id: ApplicationId,
    pub next_question_id: QuestionId,
}

impl AthenaEngine {
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            registry: self.registry.state().clone(),
            authority: self.authority.clone(),
            disputes: self.disputes.clone(),
            job_disputes: self.job_disputes.clone(),
            applications: self.applications.clone(),
            questions: self.questions.clone(),
            next_dispute_id: self.next_dispute_id,
            next_application_id: self.next_application_id,
            next_question_id: self.next_question_id,
        }
    }

    /// Serialize the engine state.
    pub fn save_state(&self) -> Result<Vec<u8>, AdjudicationError> {
        Ok(bincode::serialize(&self.snapshot())?)
    }

    /// Rebuild an engine from `save_state` output. The dispute-grade policy
    /// resets to the activation bar.
    pub fn load_state(data: &[u8], collaborators: Collaborators) -> Result<Self, AdjudicationError> {
        let snapshot: EngineSnapshot = bincode::deserialize(data)?;
        info!(
            disputes = snapshot.disputes.len(),
            applications = snapshot.applications.len(),
            questions = snapshot.questions.len(),
            "engine state restored"
        );
        Ok(Self {
            registry: OracleRegistry::from_state(snapshot.registry, Box::new(ActivationBarPolicy)),
            authority: snapshot.authority,
            disputes: snapshot.disputes,
            job_disputes: snapshot.job_disputes,
            applications: snapshot.applications,
            questions: snapshot.questions,
            next_dispute_id: snapshot.next_dispute_id,
            next_application_id: snapshot.next_application_id,
            next_question_id: snapshot.next_question_id,
            collaborators,
            transfer_lock: TransferLock::new(),
            voting: StakeWeightedVoting,
            pending_events: Vec::new(),
        })
    }
}
