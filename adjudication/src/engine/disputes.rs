//! Dispute life cycle: raise, evidence, vote, resolve, escalate.

use super::AthenaEngine;
use crate::authority::Capability;
use crate::dispute::{Dispute, DisputeStatus, EvidenceEntry};
use crate::events::AthenaEvent;
use crate::AdjudicationError;
use athena_types::quorum::required_dispute_votes;
use athena_types::{Address, DisputeId, JobId};
use athena_voting::{CastOutcome, VoteContext};
use std::collections::BTreeSet;
use tracing::{info, warn};

impl AthenaEngine {
    /// Open a dispute over `job_id`, adjudicated by `oracle`.
    ///
    /// Collects the configured dispute fee from the caller and locks the
    /// job's escrow. If the lock fails the fee is paid back.
    pub fn raise_dispute(
        &mut self,
        caller: &Address,
        job_id: &JobId,
        reason_ref: &str,
        oracle: &str,
        fee_attached: u128,
    ) -> Result<DisputeId, AdjudicationError> {
        let params = self.params();
        let _guard = self.transfer_lock.enter()?;

        if !self.collaborators.ledger.job_exists(job_id) {
            return Err(AdjudicationError::JobNotFound(job_id.clone()));
        }
        let parties = self
            .collaborators
            .ledger
            .job_parties(job_id)
            .ok_or_else(|| AdjudicationError::JobNotFound(job_id.clone()))?;
        let respondent = parties
            .counterparty(caller)
            .cloned()
            .ok_or_else(|| AdjudicationError::NotParty {
                subject: format!("job {}", job_id),
                caller: caller.to_string(),
            })?;
        if let Some(existing) = self.job_disputes.get(job_id) {
            if self.disputes.get(existing).is_some_and(|d| !d.funds_released) {
                return Err(AdjudicationError::DisputeAlreadyOpen {
                    job: job_id.clone(),
                    dispute: *existing,
                });
            }
        }
        if fee_attached < params.dispute_fee {
            return Err(AdjudicationError::FeeTooLow {
                required: params.dispute_fee,
                attached: fee_attached,
            });
        }
        self.registry.oracle(oracle)?;
        if !self.registry.validate_oracle_for_disputes(oracle) {
            return Err(AdjudicationError::OracleNotDisputeGrade(oracle.to_string()));
        }

        let id = self.next_dispute_id;
        let next_id = id.next().ok_or(AdjudicationError::Overflow)?;
        let member_count = self.registry.member_count(oracle);
        let required_votes = required_dispute_votes(
            member_count,
            params.dispute_quorum_bps,
            params.min_dispute_votes,
        );

        let fee = params.dispute_fee;
        if fee > 0 {
            self.collaborators
                .fee_token
                .collect(caller, fee)
                .map_err(|e| AdjudicationError::collaborator("fee token", e))?;
        }
        let locked_amount = match self.collaborators.ledger.lock_disputed_funds(job_id, id) {
            Ok(amount) => amount,
            Err(e) => {
                if fee > 0 {
                    if let Err(refund) = self.collaborators.fee_token.pay(caller, fee) {
                        warn!(%caller, fee, error = %refund, "could not return dispute fee after failed escrow lock");
                    }
                }
                return Err(AdjudicationError::collaborator("job ledger", e));
            }
        };

        let now = self.now();
        self.disputes.insert(
            id,
            Dispute {
                id,
                job_id: job_id.clone(),
                initiator: caller.clone(),
                respondent,
                reason_ref: reason_ref.to_string(),
                status: DisputeStatus::Created,
                assigned_oracle: oracle.to_string(),
                required_votes,
                oracle_validated: true,
                locked_amount,
                fee,
                result_determined: false,
                recipient: None,
                funds_released: false,
                refund_claimed: false,
                reward_claims: BTreeSet::new(),
                evidence: Vec::new(),
                ballots: Default::default(),
                opened_at: now,
                resolved_at: None,
            },
        );
        self.job_disputes.insert(job_id.clone(), id);
        self.next_dispute_id = next_id;

        info!(dispute = %id, job = %job_id, initiator = %caller, oracle, locked_amount, required_votes, "dispute raised");
        self.pending_events.push(AthenaEvent::DisputeRaised {
            id,
            job_id: job_id.clone(),
            initiator: caller.clone(),
            oracle: oracle.to_string(),
            locked_amount,
            required_votes,
            fee,
        });
        Ok(id)
    }

    pub fn submit_evidence(
        &mut self,
        caller: &Address,
        id: DisputeId,
        evidence_ref: &str,
    ) -> Result<(), AdjudicationError> {
        let now = self.now();
        let dispute = self.dispute_mut(id)?;
        if !dispute.is_party(caller) {
            return Err(AdjudicationError::NotParty {
                subject: id.to_string(),
                caller: caller.to_string(),
            });
        }
        if !dispute.status.accepts_evidence() {
            return Err(invalid_status(dispute, "submit evidence to"));
        }

        dispute.evidence.push(EvidenceEntry {
            submitted_by: caller.clone(),
            evidence_ref: evidence_ref.to_string(),
            submitted_at: now,
        });
        if dispute.status == DisputeStatus::Created {
            dispute.status = DisputeStatus::UnderReview;
        }

        self.pending_events.push(AthenaEvent::EvidenceSubmitted {
            id,
            by: caller.clone(),
            evidence_ref: evidence_ref.to_string(),
        });
        Ok(())
    }

    /// Vote for (`in_favor`) or against the initiator. Oracle members vote
    /// with their stake; anyone else with their DAO voting power. Votes
    /// never resolve the dispute.
    pub fn vote_on_dispute(
        &mut self,
        caller: &Address,
        id: DisputeId,
        in_favor: bool,
        reason_ref: &str,
    ) -> Result<CastOutcome, AdjudicationError> {
        let now = self.now();
        let dispute = self
            .disputes
            .get_mut(&id)
            .ok_or(AdjudicationError::DisputeNotFound(id))?;
        let ctx = VoteContext {
            registry: &self.registry,
            voting_power: self.collaborators.voting_power.as_ref(),
            now,
        };
        let outcome = self.voting.cast_vote(dispute, &ctx, caller, in_favor, reason_ref)?;

        self.pending_events.push(AthenaEvent::DisputeVoteCast {
            id,
            voter: caller.clone(),
            in_favor,
            weight: outcome.weight.amount,
            source: outcome.weight.source,
        });
        self.record_participation(caller);
        Ok(outcome)
    }

    /// Settle the dispute in favour of `recipient`, one of its two parties.
    pub fn resolve_dispute(
        &mut self,
        caller: &Address,
        id: DisputeId,
        recipient: &Address,
    ) -> Result<(), AdjudicationError> {
        self.require(Capability::Resolve, caller)?;
        let now = self.now();
        let dispute = self.dispute_mut(id)?;
        if dispute.status == DisputeStatus::Resolved {
            return Err(AdjudicationError::AlreadyResolved(id));
        }
        if !dispute.is_party(recipient) {
            return Err(AdjudicationError::InvalidRecipient {
                dispute: id,
                recipient: recipient.to_string(),
            });
        }

        dispute.result_determined = true;
        dispute.recipient = Some(recipient.clone());
        dispute.status = DisputeStatus::Resolved;
        dispute.resolved_at = Some(now);

        info!(dispute = %id, %recipient, resolved_by = %caller, "dispute resolved");
        self.pending_events.push(AthenaEvent::DisputeResolved {
            id,
            recipient: recipient.clone(),
            resolved_by: caller.clone(),
        });
        Ok(())
    }

    pub fn escalate_dispute(&mut self, caller: &Address, id: DisputeId) -> Result<(), AdjudicationError> {
        let dispute = self.dispute_mut(id)?;
        if !dispute.is_party(caller) {
            return Err(AdjudicationError::NotParty {
                subject: id.to_string(),
                caller: caller.to_string(),
            });
        }
        if !dispute.status.can_escalate() {
            return Err(invalid_status(dispute, "escalate"));
        }
        dispute.status = DisputeStatus::Escalated;

        info!(dispute = %id, by = %caller, "dispute escalated");
        self.pending_events.push(AthenaEvent::DisputeEscalated {
            id,
            by: caller.clone(),
        });
        Ok(())
    }

    pub(super) fn dispute_mut(&mut self, id: DisputeId) -> Result<&mut Dispute, AdjudicationError> {
        self.disputes
            .get_mut(&id)
            .ok_or(AdjudicationError::DisputeNotFound(id))
    }
}

pub(super) fn invalid_status(dispute: &Dispute, action: &'static str) -> AdjudicationError {
    AdjudicationError::InvalidStatus {
        decision: dispute.id.to_string(),
        status: dispute.status.to_string(),
        action,
    }
}
