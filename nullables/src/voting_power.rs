//! Nullable voting-power source.

use athena_collaborators::{CollaboratorError, VotingPowerSource};
use athena_types::Address;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct PowerState {
    powers: HashMap<Address, u128>,
    eligible: HashSet<Address>,
    fail: bool,
}

/// In-memory DAO voting power for testing.
#[derive(Clone, Default)]
pub struct NullVotingPower {
    state: Arc<Mutex<PowerState>>,
}

impl NullVotingPower {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_power(&self, who: &Address, power: u128) {
        self.state.lock().unwrap().powers.insert(who.clone(), power);
    }

    /// Mark `who` as eligible (or not) to vote in governance.
    pub fn set_governance_eligible(&self, who: &Address, eligible: bool) {
        let mut state = self.state.lock().unwrap();
        if eligible {
            state.eligible.insert(who.clone());
        } else {
            state.eligible.remove(who);
        }
    }

    /// Make every lookup fail.
    pub fn fail_lookups(&self, fail: bool) {
        self.state.lock().unwrap().fail = fail;
    }
}

impl VotingPowerSource for NullVotingPower {
    fn voting_power(&self, who: &Address) -> Result<u128, CollaboratorError> {
        let state = self.state.lock().unwrap();
        if state.fail {
            return Err(CollaboratorError::Unavailable("voting power".into()));
        }
        Ok(state.powers.get(who).copied().unwrap_or(0))
    }

    fn can_vote_in_governance(&self, who: &Address) -> Result<bool, CollaboratorError> {
        let state = self.state.lock().unwrap();
        if state.fail {
            return Err(CollaboratorError::Unavailable("voting power".into()));
        }
        Ok(state.eligible.contains(who))
    }
}
