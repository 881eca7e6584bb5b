//! Property tests: the registry invariants hold after any sequence of
//! membership, stake and minimum-stake operations.

use athena_oracle::OracleRegistry;
use athena_types::{Address, EngineParams, Timestamp};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Add(u8, u128),
    Remove(u8),
    Update(u8, u128),
    Slash(u8, u128),
    SetMinStake(u128),
    Compact,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..12, 90_000u128..300_000).prop_map(|(m, s)| Op::Add(m, s)),
        (0u8..12).prop_map(Op::Remove),
        (0u8..12, 90_000u128..300_000).prop_map(|(m, s)| Op::Update(m, s)),
        (0u8..12, 1u128..200_000).prop_map(|(m, p)| Op::Slash(m, p)),
        (50_000u128..250_000).prop_map(Op::SetMinStake),
        Just(Op::Compact),
    ]
}

fn addr(n: u8) -> Address {
    Address::new(format!("0x{:040x}", n))
}

proptest! {
    #[test]
    fn invariants_hold_after_every_operation(ops in prop::collection::vec(op(), 1..80)) {
        let params = EngineParams {
            min_oracle_members: 5,
            ..EngineParams::default()
        };
        let mut registry = OracleRegistry::new(params);
        registry
            .register_skill("welding", "ipfs://welding", 100_000, Timestamp::new(0))
            .unwrap();

        for op in ops {
            // Failed operations must leave the registry untouched, so the
            // invariants are checked regardless of the outcome.
            let _ = match op {
                Op::Add(m, s) => registry.add_member("welding", &addr(m), s, Timestamp::new(1)).map(|_| ()),
                Op::Remove(m) => registry.remove_member("welding", &addr(m)).map(|_| ()),
                Op::Update(m, s) => registry.update_member_stake("welding", &addr(m), s),
                Op::Slash(m, p) => registry.remove_stake("welding", &addr(m), p).map(|_| ()),
                Op::SetMinStake(v) => registry.set_min_stake(v),
                Op::Compact => registry.compact_members("welding").map(|_| ()),
            };
            prop_assert!(registry.audit().is_ok(), "{:?}", registry.audit());
            prop_assert_eq!(
                registry.is_oracle_active("welding"),
                registry.member_count("welding") >= 5
            );
        }
    }
}
