//! Fee settlement: escrow release split, fee refund and voter rewards.
//!
//! After a dispute is resolved:
//! - the locked escrow goes to the recipient, minus the platform fee,
//! - the initiator gets the dispute fee back iff they won,
//! - the fee is also split pro-rata by weight among voters who sided with
//!   the recipient. Shares round down and the dust stays in custody, so the
//!   rewards never exceed the fee.
//!
//! The refund is paid on top of the rewards. When the initiator wins, both
//! come out of the engine's custody as a whole, not only this dispute's fee.

use crate::dispute::Dispute;
use athena_types::quorum::{apply_bps, pro_rata_share};
use athena_types::Address;
use serde::{Deserialize, Serialize};

/// How a released escrow amount is split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseBreakdown {
    pub gross: u128,
    pub platform_fee: u128,
    pub net: u128,
}

impl ReleaseBreakdown {
    /// `None` on overflow.
    pub fn compute(gross: u128, platform_fee_bps: u32) -> Option<Self> {
        let platform_fee = apply_bps(gross, platform_fee_bps)?;
        Some(Self {
            gross,
            platform_fee,
            net: gross.checked_sub(platform_fee)?,
        })
    }
}

/// One voter's share of the reward pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardShare {
    pub voter: Address,
    pub weight: u128,
    pub amount: u128,
}

/// The part of the fee owed back to the initiator: all of it if they won,
/// nothing otherwise (including before resolution).
pub fn refund_entitlement(dispute: &Dispute) -> u128 {
    match dispute.winning_choice() {
        Some(true) => dispute.fee,
        _ => 0,
    }
}

/// What `claimant` may take as a fee refund.
pub fn refund_for(dispute: &Dispute, claimant: &Address) -> u128 {
    if *claimant == dispute.initiator {
        refund_entitlement(dispute)
    } else {
        0
    }
}

/// The amount split among correctly-siding voters: the whole fee,
/// independent of any refund.
pub fn reward_pool(dispute: &Dispute) -> u128 {
    dispute.fee
}

/// Every correctly-siding voter's share, in cast order. `None` while the
/// dispute is unresolved or on overflow.
pub fn reward_schedule(dispute: &Dispute) -> Option<Vec<RewardShare>> {
    let winning = dispute.winning_choice()?;
    let pool = reward_pool(dispute);

    let winners: Vec<_> = dispute
        .ballots
        .iter()
        .filter(|b| b.in_favor == winning)
        .collect();
    let total_weight = winners
        .iter()
        .try_fold(0u128, |acc, b| acc.checked_add(b.weight))?;

    winners
        .into_iter()
        .map(|b| {
            Some(RewardShare {
                voter: b.voter.clone(),
                weight: b.weight,
                amount: pro_rata_share(pool, b.weight, total_weight)?,
            })
        })
        .collect()
}

/// `voter`'s reward: 0 for the losing side, `None` if they did not vote
/// or the dispute is unresolved.
pub fn reward_for(dispute: &Dispute, voter: &Address) -> Option<u128> {
    let ballot = dispute.ballots.ballot(voter)?;
    if ballot.in_favor != dispute.winning_choice()? {
        return Some(0);
    }
    reward_schedule(dispute)?
        .into_iter()
        .find(|s| s.voter == *voter)
        .map(|s| s.amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispute::DisputeStatus;
    use athena_types::{DisputeId, JobId, Timestamp};
    use athena_voting::{Ballot, BallotBook};
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn addr(n: u32) -> Address {
        Address::new(format!("0x{:040x}", n))
    }

    fn dispute(fee: u128, votes: &[(u32, bool, u128)], initiator_wins: bool) -> Dispute {
        let mut ballots = BallotBook::default();
        for (n, in_favor, weight) in votes {
            ballots
                .record(
                    "dispute#1",
                    Ballot {
                        voter: addr(*n),
                        in_favor: *in_favor,
                        weight: *weight,
                        cast_at: Timestamp::new(1),
                    },
                    "",
                )
                .unwrap();
        }
        let initiator = addr(1_000);
        let respondent = addr(1_001);
        let recipient = if initiator_wins {
            initiator.clone()
        } else {
            respondent.clone()
        };
        Dispute {
            id: DisputeId::FIRST,
            job_id: JobId::new("job-1"),
            initiator,
            respondent,
            reason_ref: String::new(),
            status: DisputeStatus::Resolved,
            assigned_oracle: "welding".into(),
            required_votes: 3,
            oracle_validated: true,
            locked_amount: 0,
            fee,
            result_determined: true,
            recipient: Some(recipient),
            funds_released: false,
            refund_claimed: false,
            reward_claims: BTreeSet::new(),
            evidence: Vec::new(),
            ballots,
            opened_at: Timestamp::new(0),
            resolved_at: Some(Timestamp::new(2)),
        }
    }

    #[test]
    fn release_breakdown_splits_platform_fee() {
        let b = ReleaseBreakdown::compute(10_000, 500).unwrap();
        assert_eq!(b.platform_fee, 500);
        assert_eq!(b.net, 9_500);
        assert_eq!(ReleaseBreakdown::compute(10_000, 0).unwrap().net, 10_000);
        assert!(ReleaseBreakdown::compute(u128::MAX, 500).is_none());
    }

    #[test]
    fn winning_initiator_gets_refund_and_their_voters_split_the_fee() {
        let d = dispute(900, &[(1, true, 10), (2, false, 10), (3, true, 20)], true);
        assert_eq!(refund_for(&d, &d.initiator), 900);
        assert_eq!(refund_for(&d, &d.respondent), 0);
        assert_eq!(reward_pool(&d), 900);
        assert_eq!(reward_for(&d, &addr(1)), Some(300));
        assert_eq!(reward_for(&d, &addr(2)), Some(0));
        assert_eq!(reward_for(&d, &addr(3)), Some(600));
    }

    #[test]
    fn losing_initiator_funds_rewards_pro_rata() {
        let d = dispute(900, &[(1, false, 100), (2, false, 200), (3, true, 500)], false);
        assert_eq!(refund_for(&d, &d.initiator), 0);
        assert_eq!(reward_for(&d, &addr(1)), Some(300));
        assert_eq!(reward_for(&d, &addr(2)), Some(600));
        assert_eq!(reward_for(&d, &addr(3)), Some(0));
        assert_eq!(reward_for(&d, &addr(4)), None);
    }

    #[test]
    fn rounding_dust_stays_behind() {
        let d = dispute(100, &[(1, false, 1), (2, false, 1), (3, false, 1)], false);
        let total: u128 = reward_schedule(&d).unwrap().iter().map(|s| s.amount).sum();
        assert_eq!(total, 99);
    }

    #[test]
    fn unresolved_dispute_has_no_schedule() {
        let mut d = dispute(100, &[(1, true, 1)], true);
        d.recipient = None;
        assert!(reward_schedule(&d).is_none());
        assert_eq!(refund_entitlement(&d), 0);
    }

    proptest! {
        #[test]
        fn rewards_never_exceed_fee(
            fee in 0u128..10_000_000_000,
            votes in prop::collection::vec((any::<bool>(), 1u128..1_000_000_000_000), 0..40),
            initiator_wins in any::<bool>(),
        ) {
            let votes: Vec<_> = votes
                .into_iter()
                .enumerate()
                .map(|(i, (f, w))| (i as u32, f, w))
                .collect();
            let d = dispute(fee, &votes, initiator_wins);
            let rewards: u128 = reward_schedule(&d).unwrap().iter().map(|s| s.amount).sum();
            prop_assert!(rewards <= fee);
            prop_assert!(refund_entitlement(&d) <= fee);
        }
    }
}
