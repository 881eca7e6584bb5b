//! Post-resolution payouts: escrow release, fee refund, voter rewards.
//!
//! Each claim runs under the transfer guard and flips its one-shot flag only
//! after the collaborator confirmed the transfer.

use super::disputes::invalid_status;
use super::AthenaEngine;
use crate::events::AthenaEvent;
use crate::settlement::{self, ReleaseBreakdown};
use crate::AdjudicationError;
use athena_collaborators::ReleaseRequest;
use athena_types::{Address, DisputeId};
use tracing::info;

impl AthenaEngine {
    /// Release the locked escrow to the recipient, minus the platform fee.
    /// Only the recipient may claim.
    pub fn claim_disputed_amount(
        &mut self,
        caller: &Address,
        id: DisputeId,
    ) -> Result<ReleaseBreakdown, AdjudicationError> {
        let params = self.params();
        let _guard = self.transfer_lock.enter()?;

        let dispute = self.get_dispute(id)?;
        if !dispute.result_determined {
            return Err(AdjudicationError::ResultNotDetermined(id));
        }
        if dispute.funds_released {
            return Err(AdjudicationError::FundsAlreadyReleased(id));
        }
        let (recipient, loser) = match (dispute.recipient.as_ref(), dispute.loser()) {
            (Some(r), Some(l)) => (r.clone(), l.clone()),
            _ => return Err(AdjudicationError::ResultNotDetermined(id)),
        };
        if *caller != recipient {
            return Err(AdjudicationError::NotParty {
                subject: format!("{} payout", id),
                caller: caller.to_string(),
            });
        }
        let breakdown = ReleaseBreakdown::compute(dispute.locked_amount, params.platform_fee_bps)
            .ok_or(AdjudicationError::Overflow)?;
        let request = ReleaseRequest {
            job_id: dispute.job_id.clone(),
            dispute_id: id,
            winner: recipient.clone(),
            loser,
            amount: breakdown.gross,
            fee_bps: params.platform_fee_bps,
        };

        let released = self
            .collaborators
            .ledger
            .release_disputed_funds(&request)
            .map_err(|e| AdjudicationError::collaborator("job ledger", e))?;
        if !released {
            return Err(AdjudicationError::ReleaseDeclined(id));
        }
        self.dispute_mut(id)?.funds_released = true;

        info!(dispute = %id, %recipient, gross = breakdown.gross, net = breakdown.net, platform_fee = breakdown.platform_fee, "disputed funds released");
        self.pending_events.push(AthenaEvent::DisputedAmountClaimed {
            id,
            recipient,
            breakdown,
        });
        Ok(breakdown)
    }

    /// Return the dispute fee to the initiator if they won. Any other party
    /// gets 0 and nothing is transferred.
    pub fn claim_dispute_fee_refund(
        &mut self,
        caller: &Address,
        id: DisputeId,
    ) -> Result<u128, AdjudicationError> {
        let _guard = self.transfer_lock.enter()?;

        let dispute = self.get_dispute(id)?;
        if !dispute.is_party(caller) {
            return Err(AdjudicationError::NotParty {
                subject: id.to_string(),
                caller: caller.to_string(),
            });
        }
        if !dispute.result_determined {
            return Err(invalid_status(dispute, "claim the fee refund of"));
        }
        let amount = settlement::refund_for(dispute, caller);
        if amount == 0 {
            return Ok(0);
        }
        if dispute.refund_claimed {
            return Err(AdjudicationError::AlreadyClaimed {
                dispute: id,
                who: caller.to_string(),
                what: "fee refund",
            });
        }

        self.collaborators
            .fee_token
            .pay(caller, amount)
            .map_err(|e| AdjudicationError::collaborator("fee token", e))?;
        self.dispute_mut(id)?.refund_claimed = true;

        info!(dispute = %id, to = %caller, amount, "dispute fee refunded");
        self.pending_events.push(AthenaEvent::DisputeFeeRefunded {
            id,
            to: caller.clone(),
            amount,
        });
        Ok(amount)
    }

    /// Pay `caller` their share of the reward pool. Voters on the losing
    /// side get 0 and nothing is transferred.
    pub fn claim_dispute_fee_reward(
        &mut self,
        caller: &Address,
        id: DisputeId,
    ) -> Result<u128, AdjudicationError> {
        let _guard = self.transfer_lock.enter()?;

        let dispute = self.get_dispute(id)?;
        if !dispute.result_determined {
            return Err(invalid_status(dispute, "claim a reward from"));
        }
        if dispute.reward_claims.contains(caller) {
            return Err(AdjudicationError::AlreadyClaimed {
                dispute: id,
                who: caller.to_string(),
                what: "fee reward",
            });
        }
        let amount =
            settlement::reward_for(dispute, caller).ok_or_else(|| AdjudicationError::NotAVoter {
                dispute: id,
                caller: caller.to_string(),
            })?;
        if amount == 0 {
            return Ok(0);
        }

        self.collaborators
            .fee_token
            .pay(caller, amount)
            .map_err(|e| AdjudicationError::collaborator("fee token", e))?;
        self.dispute_mut(id)?.reward_claims.insert(caller.clone());

        info!(dispute = %id, voter = %caller, amount, "dispute fee reward paid");
        self.pending_events.push(AthenaEvent::DisputeFeeRewardClaimed {
            id,
            voter: caller.clone(),
            amount,
        });
        Ok(amount)
    }
}
