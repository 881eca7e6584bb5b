#![allow(dead_code)]

use athena_adjudication::{AthenaEngine, AthenaEvent, Collaborators, RecorderChain};
use athena_nullables::{
    NullClock, NullFeeToken, NullGovernanceSink, NullJobLedger, NullVotingPower,
};
use athena_oracle::OracleEvent;
use athena_types::{Address, DisputeId, EngineParams, JobId};

pub const STAKE: u128 = 100_000;
pub const ESCROW: u128 = 1_000_000;

pub fn addr(n: u32) -> Address {
    Address::new(format!("0x{:040x}", n))
}

pub fn owner() -> Address {
    addr(0xAAAA)
}

pub fn client() -> Address {
    addr(0xC11E)
}

pub fn freelancer() -> Address {
    addr(0xF4EE)
}

/// Member `i` of the test oracles.
pub fn member(i: u32) -> Address {
    addr(i)
}

pub struct Harness {
    pub engine: AthenaEngine,
    pub ledger: NullJobLedger,
    pub power: NullVotingPower,
    pub token: NullFeeToken,
    pub clock: NullClock,
    pub tracker: NullGovernanceSink,
    pub native: NullGovernanceSink,
    pub legacy: NullGovernanceSink,
}

pub fn harness(params: EngineParams) -> Harness {
    let ledger = NullJobLedger::new();
    let power = NullVotingPower::new();
    let token = NullFeeToken::new();
    let clock = NullClock::new(1_000);
    let tracker = NullGovernanceSink::new("tracker");
    let native = NullGovernanceSink::new("native-governance");
    let legacy = NullGovernanceSink::new("legacy-dao");

    let collaborators = Collaborators::new(
        Box::new(ledger.clone()),
        Box::new(power.clone()),
        Box::new(token.clone()),
    )
    .with_clock(Box::new(clock.clone()))
    .with_recorders(
        RecorderChain::new()
            .with_sink(Box::new(tracker.clone()))
            .with_sink(Box::new(native.clone()))
            .with_sink(Box::new(legacy.clone())),
    );

    Harness {
        engine: AthenaEngine::new(owner(), params, collaborators),
        ledger,
        power,
        token,
        clock,
        tracker,
        native,
        legacy,
    }
}

/// Small oracles so dispute tests stay readable.
pub fn small_params() -> EngineParams {
    EngineParams {
        min_oracle_members: 3,
        ..EngineParams::default()
    }
}

impl Harness {
    /// Register `name` and give it members `1..=count`.
    pub fn seed_oracle(&mut self, name: &str, count: u32) -> Vec<Address> {
        let owner = owner();
        self.engine
            .register_skill(&owner, name, "ipfs://skill", STAKE)
            .unwrap();
        let members: Vec<Address> = (1..=count).map(member).collect();
        let stakes = vec![STAKE; members.len()];
        if !members.is_empty() {
            self.engine
                .add_oracle_members(&owner, name, &members, &stakes)
                .unwrap();
        }
        members
    }

    /// A job between `client()` and `freelancer()` with funds in escrow.
    pub fn seed_job(&self, id: &str) -> JobId {
        let job = JobId::new(id);
        self.ledger.add_job(&job, &client(), &freelancer(), ESCROW);
        job
    }

    /// Client raises a dispute on a fresh job, paying exactly the fee.
    pub fn raise(&mut self, job: &str, oracle: &str) -> DisputeId {
        let job = self.seed_job(job);
        let fee = self.engine.params().dispute_fee;
        self.token.mint(&client(), fee);
        self.engine
            .raise_dispute(&client(), &job, "ipfs://reason", oracle, fee)
            .unwrap()
    }
}

pub fn activations(events: &[AthenaEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, AthenaEvent::Oracle(OracleEvent::OracleActivated { .. })))
        .count()
}
