use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use athena_adjudication::settlement::reward_schedule;
use athena_adjudication::{AthenaEngine, Collaborators};
use athena_nullables::{NullClock, NullFeeToken, NullJobLedger, NullVotingPower};
use athena_types::{Address, DisputeId, EngineParams, JobId};

const STAKE: u128 = 100_000;

fn addr(n: u32) -> Address {
    Address::new(format!("0x{:040x}", n))
}

struct Setup {
    engine: AthenaEngine,
    members: Vec<Address>,
    dispute: DisputeId,
}

/// An active oracle with `count` members and one open dispute.
fn setup(count: u32) -> Setup {
    let ledger = NullJobLedger::new();
    let token = NullFeeToken::new();
    let collaborators = Collaborators::new(
        Box::new(ledger.clone()),
        Box::new(NullVotingPower::new()),
        Box::new(token.clone()),
    )
    .with_clock(Box::new(NullClock::new(1_000)));

    let owner = addr(0xAAAA);
    let client = addr(0xC11E);
    let params = EngineParams {
        min_oracle_members: 3,
        ..EngineParams::default()
    };
    let mut engine = AthenaEngine::new(owner.clone(), params, collaborators);

    engine
        .register_skill(&owner, "Welding", "ipfs://skill", STAKE)
        .unwrap();
    let members: Vec<Address> = (1..=count).map(addr).collect();
    let stakes: Vec<u128> = (1..=count).map(|i| STAKE + i as u128).collect();
    engine
        .add_oracle_members(&owner, "Welding", &members, &stakes)
        .unwrap();

    let job = JobId::new("job-1");
    ledger.add_job(&job, &client, &addr(0xF4EE), 1_000_000);
    let fee = engine.params().dispute_fee;
    token.mint(&client, fee);
    let dispute = engine
        .raise_dispute(&client, &job, "ipfs://reason", "Welding", fee)
        .unwrap();
    engine.drain_events();

    Setup {
        engine,
        members,
        dispute,
    }
}

fn bench_dispute_voting(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispute_voting");

    for count in [3u32, 20, 100, 500] {
        group.bench_with_input(BenchmarkId::new("all_members_vote", count), &count, |b, &n| {
            b.iter_batched(
                || setup(n),
                |mut s| {
                    for (i, m) in s.members.iter().enumerate() {
                        black_box(
                            s.engine
                                .vote_on_dispute(m, s.dispute, i % 3 != 0, "")
                                .unwrap(),
                        );
                    }
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_reward_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("reward_schedule");

    for count in [3u32, 20, 100, 500] {
        let mut s = setup(count);
        for (i, m) in s.members.iter().enumerate() {
            s.engine
                .vote_on_dispute(m, s.dispute, i % 3 != 0, "")
                .unwrap();
        }
        let owner = addr(0xAAAA);
        s.engine
            .resolve_dispute(&owner, s.dispute, &addr(0xF4EE))
            .unwrap();
        let dispute = s.engine.get_dispute(s.dispute).unwrap().clone();

        group.bench_with_input(BenchmarkId::new("voters", count), &count, |b, _| {
            b.iter(|| black_box(reward_schedule(black_box(&dispute))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dispute_voting, bench_reward_schedule);
criterion_main!(benches);
