//! Skill-verification applications and questions.

use super::AthenaEngine;
use crate::events::AthenaEvent;
use crate::question::{Question, QuestionStatus};
use crate::skill_verification::{SkillApplication, SkillStatus};
use crate::AdjudicationError;
use athena_types::{Address, ApplicationId, QuestionId};
use athena_voting::{CastOutcome, Verdict, VoteContext};
use tracing::info;

impl AthenaEngine {
    pub fn submit_skill_application(
        &mut self,
        caller: &Address,
        payload_ref: &str,
        oracle: &str,
    ) -> Result<ApplicationId, AdjudicationError> {
        self.require_active_oracle(oracle)?;
        let id = self.next_application_id;
        let next_id = id.next().ok_or(AdjudicationError::Overflow)?;
        let now = self.now();

        self.applications.insert(
            id,
            SkillApplication {
                id,
                applicant: caller.clone(),
                payload_ref: payload_ref.to_string(),
                assigned_oracle: oracle.to_string(),
                status: SkillStatus::Pending,
                ballots: Default::default(),
                opened_at: now,
            },
        );
        self.next_application_id = next_id;

        info!(application = %id, applicant = %caller, oracle, "skill application submitted");
        self.pending_events.push(AthenaEvent::SkillApplicationSubmitted {
            id,
            applicant: caller.clone(),
            oracle: oracle.to_string(),
        });
        Ok(id)
    }

    /// Vote on a skill application. Finalizes it once more than half of the
    /// oracle's current members have voted and one side outweighs the other.
    pub fn vote_on_skill_application(
        &mut self,
        caller: &Address,
        id: ApplicationId,
        in_favor: bool,
        reason_ref: &str,
    ) -> Result<CastOutcome, AdjudicationError> {
        let now = self.now();
        let application = self
            .applications
            .get_mut(&id)
            .ok_or(AdjudicationError::ApplicationNotFound(id))?;
        let ctx = VoteContext {
            registry: &self.registry,
            voting_power: self.collaborators.voting_power.as_ref(),
            now,
        };
        let outcome = self.voting.cast_vote(application, &ctx, caller, in_favor, reason_ref)?;
        let status = application.status;

        self.pending_events.push(AthenaEvent::SkillApplicationVoteCast {
            id,
            voter: caller.clone(),
            in_favor,
            weight: outcome.weight.amount,
        });
        if outcome.verdict != Verdict::Pending {
            info!(application = %id, %status, "skill application finalized");
            self.pending_events
                .push(AthenaEvent::SkillApplicationFinalized { id, status });
        }
        self.record_participation(caller);
        Ok(outcome)
    }

    pub fn ask_question(
        &mut self,
        caller: &Address,
        question_ref: &str,
        oracle: &str,
    ) -> Result<QuestionId, AdjudicationError> {
        self.require_active_oracle(oracle)?;
        let id = self.next_question_id;
        let next_id = id.next().ok_or(AdjudicationError::Overflow)?;
        let now = self.now();

        self.questions.insert(
            id,
            Question {
                id,
                asker: caller.clone(),
                question_ref: question_ref.to_string(),
                assigned_oracle: oracle.to_string(),
                status: QuestionStatus::Pending,
                ballots: Default::default(),
                opened_at: now,
            },
        );
        self.next_question_id = next_id;

        info!(question = %id, asker = %caller, oracle, "question asked");
        self.pending_events.push(AthenaEvent::QuestionAsked {
            id,
            asker: caller.clone(),
            oracle: oracle.to_string(),
        });
        Ok(id)
    }

    pub fn vote_on_question(
        &mut self,
        caller: &Address,
        id: QuestionId,
        in_favor: bool,
        reason_ref: &str,
    ) -> Result<CastOutcome, AdjudicationError> {
        let now = self.now();
        let question = self
            .questions
            .get_mut(&id)
            .ok_or(AdjudicationError::QuestionNotFound(id))?;
        let ctx = VoteContext {
            registry: &self.registry,
            voting_power: self.collaborators.voting_power.as_ref(),
            now,
        };
        let outcome = self.voting.cast_vote(question, &ctx, caller, in_favor, reason_ref)?;
        let status = question.status;

        self.pending_events.push(AthenaEvent::QuestionVoteCast {
            id,
            voter: caller.clone(),
            in_favor,
            weight: outcome.weight.amount,
        });
        if outcome.verdict != Verdict::Pending {
            info!(question = %id, %status, "question finalized");
            self.pending_events
                .push(AthenaEvent::QuestionFinalized { id, status });
        }
        self.record_participation(caller);
        Ok(outcome)
    }

    fn require_active_oracle(&self, oracle: &str) -> Result<(), AdjudicationError> {
        self.registry.oracle(oracle)?;
        if !self.registry.is_oracle_active(oracle) {
            return Err(AdjudicationError::OracleInactive(oracle.to_string()));
        }
        Ok(())
    }
}
