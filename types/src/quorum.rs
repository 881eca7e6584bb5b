//! Quorum and pro-rata arithmetic.
//!
//! All values are integers; fractions are expressed in basis points
//! (10_000 = 100%) and divisions round as documented per function.

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Votes a dispute needs before it is considered adequately deliberated:
/// `max(floor_votes, ceil(quorum_bps × member_count / 10_000))`.
///
/// With the default parameters this is `max(3, ⌈0.6 × member_count⌉)`.
pub fn required_dispute_votes(member_count: u32, quorum_bps: u32, floor_votes: u32) -> u32 {
    let scaled = u64::from(member_count) * u64::from(quorum_bps);
    let ceil = scaled.div_ceil(BPS_DENOMINATOR as u64);
    let ceil = u32::try_from(ceil).unwrap_or(u32::MAX);
    ceil.max(floor_votes)
}

/// Head count a skill application or question needs before it may finalize:
/// more than half of the oracle's *current* member count.
pub fn finalization_quorum(member_count: u32) -> u32 {
    member_count / 2 + 1
}

/// `amount × bps / 10_000`, rounded down. `None` on overflow.
pub fn apply_bps(amount: u128, bps: u32) -> Option<u128> {
    amount
        .checked_mul(u128::from(bps))
        .map(|v| v / BPS_DENOMINATOR)
}

/// The share of `pool` owed to a participant contributing `weight` out of
/// `total_weight`, rounded down so that shares never sum above `pool`.
///
/// Returns 0 when `total_weight` is 0. `None` on overflow.
pub fn pro_rata_share(pool: u128, weight: u128, total_weight: u128) -> Option<u128> {
    if total_weight == 0 {
        return Some(0);
    }
    pool.checked_mul(weight).map(|v| v / total_weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispute_votes_have_a_floor_of_three() {
        assert_eq!(required_dispute_votes(0, 6000, 3), 3);
        assert_eq!(required_dispute_votes(4, 6000, 3), 3);
        assert_eq!(required_dispute_votes(5, 6000, 3), 3);
    }

    #[test]
    fn dispute_votes_round_up() {
        // 0.6 × 6 = 3.6 → 4
        assert_eq!(required_dispute_votes(6, 6000, 3), 4);
        // 0.6 × 20 = 12 exactly
        assert_eq!(required_dispute_votes(20, 6000, 3), 12);
        // 0.6 × 21 = 12.6 → 13
        assert_eq!(required_dispute_votes(21, 6000, 3), 13);
    }

    #[test]
    fn finalization_quorum_is_strict_majority_of_members() {
        assert_eq!(finalization_quorum(20), 11);
        assert_eq!(finalization_quorum(21), 11);
        assert_eq!(finalization_quorum(1), 1);
        assert_eq!(finalization_quorum(0), 1);
    }

    #[test]
    fn bps_rounds_down() {
        assert_eq!(apply_bps(1_000, 500), Some(50));
        assert_eq!(apply_bps(19, 500), Some(0));
        assert_eq!(apply_bps(u128::MAX, 2), None);
    }

    #[test]
    fn pro_rata_with_zero_total_is_zero() {
        assert_eq!(pro_rata_share(1_000, 5, 0), Some(0));
        assert_eq!(pro_rata_share(1_000, 1, 3), Some(333));
    }
}
