//! Caller authorization as an ordered chain of strategies.
//!
//! Each capability owns a fixed list of strategies; the first strategy that
//! accepts the caller wins. Strategies never error: a failing voting-power
//! lookup is treated as "not eligible".

use athena_collaborators::VotingPowerSource;
use athena_types::Address;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The identities the engine trusts for privileged operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityConfig {
    pub owner: Address,
    pub governance_contract: Option<Address>,
    pub legacy_dao: Option<Address>,
}

impl AuthorityConfig {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            governance_contract: None,
            legacy_dao: None,
        }
    }
}

/// What a caller is trying to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Registry administration and parameter changes.
    Administer,
    /// Resolving disputes and reporting malicious members.
    Resolve,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Administer => "administer oracles",
            Capability::Resolve => "resolve disputes",
        }
    }
}

/// Inputs a strategy may consult.
pub struct AuthContext<'a> {
    pub config: &'a AuthorityConfig,
    pub voting_power: &'a dyn VotingPowerSource,
}

pub trait AuthorizationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn authorizes(&self, caller: &Address, ctx: &AuthContext<'_>) -> bool;
}

pub struct OwnerStrategy;

impl AuthorizationStrategy for OwnerStrategy {
    fn name(&self) -> &'static str {
        "owner"
    }

    fn authorizes(&self, caller: &Address, ctx: &AuthContext<'_>) -> bool {
        *caller == ctx.config.owner
    }
}

pub struct GovernanceContractStrategy;

impl AuthorizationStrategy for GovernanceContractStrategy {
    fn name(&self) -> &'static str {
        "governance-contract"
    }

    fn authorizes(&self, caller: &Address, ctx: &AuthContext<'_>) -> bool {
        ctx.config.governance_contract.as_ref() == Some(caller)
    }
}

pub struct LegacyDaoStrategy;

impl AuthorizationStrategy for LegacyDaoStrategy {
    fn name(&self) -> &'static str {
        "legacy-dao"
    }

    fn authorizes(&self, caller: &Address, ctx: &AuthContext<'_>) -> bool {
        ctx.config.legacy_dao.as_ref() == Some(caller)
    }
}

/// Anyone the voting-power collaborator certifies as governance-eligible.
pub struct GovernanceEligibleStrategy;

impl AuthorizationStrategy for GovernanceEligibleStrategy {
    fn name(&self) -> &'static str {
        "governance-eligible"
    }

    fn authorizes(&self, caller: &Address, ctx: &AuthContext<'_>) -> bool {
        ctx.voting_power
            .can_vote_in_governance(caller)
            .unwrap_or_else(|e| {
                debug!(%caller, error = %e, "governance eligibility lookup failed");
                false
            })
    }
}

/// An ordered list of strategies, evaluated first-match-wins.
pub struct AuthorityChain {
    strategies: Vec<Box<dyn AuthorizationStrategy>>,
}

impl AuthorityChain {
    pub fn new(strategies: Vec<Box<dyn AuthorizationStrategy>>) -> Self {
        Self { strategies }
    }

    /// The chain guarding `capability`.
    pub fn for_capability(capability: Capability) -> Self {
        let mut strategies: Vec<Box<dyn AuthorizationStrategy>> = vec![
            Box::new(OwnerStrategy),
            Box::new(GovernanceContractStrategy),
            Box::new(LegacyDaoStrategy),
        ];
        if capability == Capability::Resolve {
            strategies.push(Box::new(GovernanceEligibleStrategy));
        }
        Self::new(strategies)
    }

    /// Name of the first strategy accepting `caller`, if any.
    pub fn authorize(&self, caller: &Address, ctx: &AuthContext<'_>) -> Option<&'static str> {
        self.strategies
            .iter()
            .find(|s| s.authorizes(caller, ctx))
            .map(|s| s.name())
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use athena_nullables::NullVotingPower;

    fn config() -> AuthorityConfig {
        AuthorityConfig {
            owner: Address::new("0x01"),
            governance_contract: Some(Address::new("0x02")),
            legacy_dao: Some(Address::new("0x03")),
        }
    }

    #[test]
    fn chains_are_ordered() {
        assert_eq!(
            AuthorityChain::for_capability(Capability::Administer).strategy_names(),
            vec!["owner", "governance-contract", "legacy-dao"]
        );
        assert_eq!(
            AuthorityChain::for_capability(Capability::Resolve).strategy_names(),
            vec!["owner", "governance-contract", "legacy-dao", "governance-eligible"]
        );
    }

    #[test]
    fn first_match_wins() {
        let power = NullVotingPower::new();
        let config = config();
        // The owner is also governance-eligible; the owner strategy answers first.
        power.set_governance_eligible(&config.owner, true);
        let ctx = AuthContext {
            config: &config,
            voting_power: &power,
        };
        let chain = AuthorityChain::for_capability(Capability::Resolve);
        assert_eq!(chain.authorize(&Address::new("0x01"), &ctx), Some("owner"));
        assert_eq!(chain.authorize(&Address::new("0x03"), &ctx), Some("legacy-dao"));
    }

    #[test]
    fn eligibility_only_counts_for_resolution() {
        let power = NullVotingPower::new();
        let voter = Address::new("0x99");
        power.set_governance_eligible(&voter, true);
        let config = config();
        let ctx = AuthContext {
            config: &config,
            voting_power: &power,
        };
        assert_eq!(
            AuthorityChain::for_capability(Capability::Administer).authorize(&voter, &ctx),
            None
        );
        assert_eq!(
            AuthorityChain::for_capability(Capability::Resolve).authorize(&voter, &ctx),
            Some("governance-eligible")
        );
    }

    #[test]
    fn failed_lookup_denies() {
        let power = NullVotingPower::new();
        let voter = Address::new("0x99");
        power.set_governance_eligible(&voter, true);
        power.fail_lookups(true);
        let config = config();
        let ctx = AuthContext {
            config: &config,
            voting_power: &power,
        };
        assert_eq!(
            AuthorityChain::for_capability(Capability::Resolve).authorize(&voter, &ctx),
            None
        );
    }
}
