//! Vote weight resolution.
//!
//! Active members of the decision's oracle vote with their stake. Where the
//! decision accepts outside voters, anyone else falls back to the voting
//! power reported by the DAO collaborator; a failing or zero answer means
//! the identity may not vote.

use crate::VotingError;
use athena_collaborators::VotingPowerSource;
use athena_oracle::OracleRegistry;
use athena_types::Address;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Who may vote on a decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoterPolicy {
    /// Only active members of the assigned oracle.
    OracleMembersOnly,
    /// Oracle members, or anyone with DAO voting power.
    MembersOrVotingPower,
}

/// Where a vote's weight came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightSource {
    Stake,
    VotingPower,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoteWeight {
    pub amount: u128,
    pub source: WeightSource,
}

/// Resolve the weight `voter` brings to a decision assigned to `oracle`.
pub fn resolve_weight(
    registry: &OracleRegistry,
    oracle: &str,
    voter: &Address,
    policy: VoterPolicy,
    voting_power: &dyn VotingPowerSource,
    decision: &str,
) -> Result<VoteWeight, VotingError> {
    let stake = registry.member_stake(oracle, voter);
    if stake > 0 {
        return Ok(VoteWeight {
            amount: stake,
            source: WeightSource::Stake,
        });
    }

    let unauthorized = || VotingError::Unauthorized {
        decision: decision.to_string(),
        voter: voter.to_string(),
    };

    match policy {
        VoterPolicy::OracleMembersOnly => Err(unauthorized()),
        VoterPolicy::MembersOrVotingPower => {
            let power = voting_power.voting_power(voter).unwrap_or_else(|e| {
                debug!(%voter, error = %e, "voting power lookup failed; treating as zero");
                0
            });
            if power == 0 {
                return Err(unauthorized());
            }
            Ok(VoteWeight {
                amount: power,
                source: WeightSource::VotingPower,
            })
        }
    }
}
