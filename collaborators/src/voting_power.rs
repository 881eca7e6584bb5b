//! Voting power supplied by the token-staking / DAO membership contract.

use crate::CollaboratorError;
use athena_types::Address;

/// Source of voting power for identities that are not oracle members.
pub trait VotingPowerSource: Send {
    /// Voting power of an identity; 0 if it has none.
    fn voting_power(&self, who: &Address) -> Result<u128, CollaboratorError>;

    /// Whether the identity may take part in governance decisions.
    fn can_vote_in_governance(&self, who: &Address) -> Result<bool, CollaboratorError>;
}
