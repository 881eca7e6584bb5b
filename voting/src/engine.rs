//! The reusable cast-vote procedure shared by every decision type.

use crate::ballot::{Ballot, BallotBook};
use crate::tally::{FinalizationRule, Verdict};
use crate::weight::{resolve_weight, VoteWeight, VoterPolicy};
use crate::VotingError;
use athena_collaborators::VotingPowerSource;
use athena_oracle::OracleRegistry;
use athena_types::{Address, Timestamp};
use tracing::debug;

/// Anything that can be voted on: disputes, skill applications, questions.
pub trait Decision {
    /// Label used in errors and logs, e.g. `dispute#4`.
    fn label(&self) -> String;

    /// Name of the oracle adjudicating this decision.
    fn oracle(&self) -> &str;

    /// Whether the current status accepts votes.
    fn is_open(&self) -> bool;

    /// Current status, for error messages.
    fn status_label(&self) -> String;

    fn voter_policy(&self) -> VoterPolicy;

    fn rule(&self) -> &dyn FinalizationRule;

    fn ballots(&self) -> &BallotBook;

    fn ballots_mut(&mut self) -> &mut BallotBook;

    /// Called once, right after the first ballot is recorded.
    fn begin_deliberation(&mut self);

    /// Called when the rule returns a final verdict.
    fn finalize(&mut self, verdict: Verdict);
}

/// Result of a successful vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastOutcome {
    pub weight: VoteWeight,
    pub first_vote: bool,
    /// `Pending` unless this vote finalized the decision.
    pub verdict: Verdict,
}

/// What a vote is weighed against: the registry, the DAO voting-power
/// source and the time the ballot is stamped with.
#[derive(Clone, Copy)]
pub struct VoteContext<'a> {
    pub registry: &'a OracleRegistry,
    pub voting_power: &'a dyn VotingPowerSource,
    pub now: Timestamp,
}

/// Engine for casting stake-weighted votes.
pub struct StakeWeightedVoting;

impl StakeWeightedVoting {
    /// Cast `voter`'s vote on `decision`.
    ///
    /// Checks run in a fixed order: double vote, open status, weight. Only
    /// after all of them pass is the ballot recorded.
    pub fn cast_vote<D: Decision>(
        &self,
        decision: &mut D,
        ctx: &VoteContext<'_>,
        voter: &Address,
        in_favor: bool,
        reason_ref: &str,
    ) -> Result<CastOutcome, VotingError> {
        let registry = ctx.registry;
        let label = decision.label();
        if decision.ballots().has_voted(voter) {
            return Err(VotingError::AlreadyVoted {
                decision: label,
                voter: voter.to_string(),
            });
        }
        if !decision.is_open() {
            return Err(VotingError::NotOpen {
                decision: label,
                status: decision.status_label(),
            });
        }
        let oracle = decision.oracle().to_string();
        registry
            .oracle(&oracle)
            .map_err(|_| VotingError::OracleNotFound(oracle.clone()))?;
        let weight = resolve_weight(
            registry,
            &oracle,
            voter,
            decision.voter_policy(),
            ctx.voting_power,
            &label,
        )?;

        let first_vote = decision.ballots().is_empty();
        decision.ballots_mut().record(
            &label,
            Ballot {
                voter: voter.clone(),
                in_favor,
                weight: weight.amount,
                cast_at: ctx.now,
            },
            reason_ref,
        )?;
        if first_vote {
            decision.begin_deliberation();
        }

        let member_count = registry.member_count(&oracle);
        let verdict = decision
            .rule()
            .evaluate(decision.ballots().tally(), member_count);
        if verdict != Verdict::Pending {
            decision.finalize(verdict);
        }

        debug!(
            decision = %label,
            %voter,
            in_favor,
            weight = weight.amount,
            ?verdict,
            "vote cast"
        );
        Ok(CastOutcome {
            weight,
            first_vote,
            verdict,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tally::{ExplicitResolution, QuorumMajority};
    use crate::weight::WeightSource;
    use athena_nullables::NullVotingPower;
    use athena_types::EngineParams;

    #[derive(Debug, PartialEq)]
    enum Status {
        Open,
        Deliberating,
        Approved,
        Rejected,
    }

    struct TestDecision {
        status: Status,
        policy: VoterPolicy,
        auto: bool,
        ballots: BallotBook,
    }

    impl TestDecision {
        fn new(policy: VoterPolicy, auto: bool) -> Self {
            Self {
                status: Status::Open,
                policy,
                auto,
                ballots: BallotBook::default(),
            }
        }
    }

    impl Decision for TestDecision {
        fn label(&self) -> String {
            "test#1".into()
        }
        fn oracle(&self) -> &str {
            "welding"
        }
        fn is_open(&self) -> bool {
            matches!(self.status, Status::Open | Status::Deliberating)
        }
        fn status_label(&self) -> String {
            format!("{:?}", self.status)
        }
        fn voter_policy(&self) -> VoterPolicy {
            self.policy
        }
        fn rule(&self) -> &dyn FinalizationRule {
            if self.auto {
                &QuorumMajority
            } else {
                &ExplicitResolution
            }
        }
        fn ballots(&self) -> &BallotBook {
            &self.ballots
        }
        fn ballots_mut(&mut self) -> &mut BallotBook {
            &mut self.ballots
        }
        fn begin_deliberation(&mut self) {
            self.status = Status::Deliberating;
        }
        fn finalize(&mut self, verdict: Verdict) {
            self.status = match verdict {
                Verdict::Approved => Status::Approved,
                Verdict::Rejected => Status::Rejected,
                Verdict::Pending => Status::Deliberating,
            };
        }
    }

    fn addr(n: u32) -> Address {
        Address::new(format!("0x{:040x}", n))
    }

    fn registry(members: u32) -> OracleRegistry {
        let mut registry = OracleRegistry::new(EngineParams {
            min_oracle_members: 3,
            ..EngineParams::default()
        });
        registry
            .register_skill("welding", "ipfs://w", 100_000, Timestamp::new(0))
            .unwrap();
        for i in 1..=members {
            registry
                .add_member("welding", &addr(i), 100_000, Timestamp::new(0))
                .unwrap();
        }
        registry
    }

    fn ctx<'a>(registry: &'a OracleRegistry, power: &'a NullVotingPower) -> VoteContext<'a> {
        VoteContext {
            registry,
            voting_power: power,
            now: Timestamp::new(1),
        }
    }

    #[test]
    fn first_vote_begins_deliberation() {
        let registry = registry(5);
        let power = NullVotingPower::new();
        let mut decision = TestDecision::new(VoterPolicy::OracleMembersOnly, true);
        let outcome = StakeWeightedVoting
            .cast_vote(&mut decision, &ctx(&registry, &power), &addr(1), true, "r")
            .unwrap();
        assert!(outcome.first_vote);
        assert_eq!(outcome.weight.source, WeightSource::Stake);
        assert_eq!(decision.status, Status::Deliberating);
    }

    #[test]
    fn double_vote_checked_before_status() {
        let registry = registry(5);
        let mut decision = TestDecision::new(VoterPolicy::OracleMembersOnly, false);
        let power = NullVotingPower::new();
        StakeWeightedVoting
            .cast_vote(&mut decision, &ctx(&registry, &power), &addr(1), true, "r")
            .unwrap();
        decision.status = Status::Approved;
        let err = StakeWeightedVoting
            .cast_vote(&mut decision, &ctx(&registry, &power), &addr(1), true, "r")
            .unwrap_err();
        assert!(matches!(err, VotingError::AlreadyVoted { .. }));
        let err = StakeWeightedVoting
            .cast_vote(&mut decision, &ctx(&registry, &power), &addr(2), true, "r")
            .unwrap_err();
        assert!(matches!(err, VotingError::NotOpen { .. }));
    }

    #[test]
    fn outsiders_rejected_for_member_only_decisions() {
        let registry = registry(5);
        let power = NullVotingPower::new();
        power.set_power(&addr(99), 1_000);
        let mut decision = TestDecision::new(VoterPolicy::OracleMembersOnly, true);
        let err = StakeWeightedVoting
            .cast_vote(&mut decision, &ctx(&registry, &power), &addr(99), true, "r")
            .unwrap_err();
        assert!(matches!(err, VotingError::Unauthorized { .. }));
        assert!(decision.ballots.is_empty());
    }

    #[test]
    fn outsiders_use_voting_power_when_allowed() {
        let registry = registry(5);
        let power = NullVotingPower::new();
        power.set_power(&addr(99), 1_000);
        let mut decision = TestDecision::new(VoterPolicy::MembersOrVotingPower, false);
        let outcome = StakeWeightedVoting
            .cast_vote(&mut decision, &ctx(&registry, &power), &addr(99), false, "r")
            .unwrap();
        assert_eq!(outcome.weight.source, WeightSource::VotingPower);
        assert_eq!(decision.ballots.tally().against_weight, 1_000);
    }

    #[test]
    fn failing_voting_power_counts_as_zero() {
        let registry = registry(5);
        let power = NullVotingPower::new();
        power.set_power(&addr(99), 1_000);
        power.fail_lookups(true);
        let mut decision = TestDecision::new(VoterPolicy::MembersOrVotingPower, false);
        let err = StakeWeightedVoting
            .cast_vote(&mut decision, &ctx(&registry, &power), &addr(99), true, "r")
            .unwrap_err();
        assert_eq!(err.kind(), athena_types::ErrorKind::Authorization);
    }

    #[test]
    fn auto_finalizes_at_quorum() {
        let registry = registry(5);
        let power = NullVotingPower::new();
        let mut decision = TestDecision::new(VoterPolicy::OracleMembersOnly, true);
        for i in 1..=2 {
            let outcome = StakeWeightedVoting
                .cast_vote(&mut decision, &ctx(&registry, &power), &addr(i), true, "r")
                .unwrap();
            assert_eq!(outcome.verdict, Verdict::Pending);
        }
        let outcome = StakeWeightedVoting
            .cast_vote(&mut decision, &ctx(&registry, &power), &addr(3), false, "r")
            .unwrap();
        assert_eq!(outcome.verdict, Verdict::Approved);
        assert_eq!(decision.status, Status::Approved);
    }
}
