use proptest::prelude::*;

use athena_types::quorum::{finalization_quorum, pro_rata_share, required_dispute_votes};
use athena_types::{DisputeId, EngineParams, Timestamp};

proptest! {
    /// required votes = max(3, ceil(0.6 × n)) for the default parameters.
    #[test]
    fn dispute_votes_match_closed_form(n in 0u32..100_000) {
        let params = EngineParams::default();
        let got = required_dispute_votes(n, params.dispute_quorum_bps, params.min_dispute_votes);
        let ceil = (u64::from(n) * 6 + 9) / 10;
        prop_assert_eq!(u64::from(got), ceil.max(3));
    }

    /// The required vote count never exceeds the member count once the
    /// oracle has at least the floor number of members.
    #[test]
    fn dispute_votes_never_exceed_members(n in 3u32..100_000) {
        prop_assert!(required_dispute_votes(n, 6000, 3) <= n);
    }

    /// Finalization quorum is a strict majority of members.
    #[test]
    fn finalization_quorum_is_strict_majority(n in 0u32..100_000) {
        let q = finalization_quorum(n);
        prop_assert!(u64::from(q) * 2 > u64::from(n));
        prop_assert!(q == 1 || u64::from(q - 1) * 2 <= u64::from(n));
    }

    /// Pro-rata shares never sum above the pool.
    #[test]
    fn pro_rata_shares_bounded_by_pool(
        pool in 0u128..1_000_000_000,
        weights in prop::collection::vec(1u128..1_000_000, 1..40),
    ) {
        let total: u128 = weights.iter().sum();
        let paid: u128 = weights
            .iter()
            .map(|w| pro_rata_share(pool, *w, total).unwrap())
            .sum();
        prop_assert!(paid <= pool);
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
    }

    /// Timestamp has_expired agrees with manual arithmetic.
    #[test]
    fn timestamp_has_expired(base in 0u64..1_000_000, duration in 0u64..1_000_000, now in 0u64..3_000_000) {
        let t = Timestamp::new(base);
        prop_assert_eq!(t.has_expired(duration, Timestamp::new(now)), now >= base + duration);
    }

    /// Decision ids survive a bincode roundtrip.
    #[test]
    fn dispute_id_bincode_roundtrip(raw in 0u64..u64::MAX) {
        let id = DisputeId::new(raw);
        let encoded = bincode::serialize(&id).unwrap();
        let decoded: DisputeId = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, id);
    }
}
