//! Nullable governance-action sink.

use athena_collaborators::{CollaboratorError, GovernanceActionSink};
use athena_types::Address;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct SinkState {
    recorded: Vec<Address>,
    attempts: usize,
    failing: bool,
}

/// Records governance actions in memory; can be switched to fail.
#[derive(Clone)]
pub struct NullGovernanceSink {
    name: String,
    state: Arc<Mutex<SinkState>>,
}

impl NullGovernanceSink {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: Arc::new(Mutex::new(SinkState::default())),
        }
    }

    /// A sink that rejects every call.
    pub fn failing(name: &str) -> Self {
        let sink = Self::new(name);
        sink.set_failing(true);
        sink
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.lock().unwrap().failing = failing;
    }

    /// Identities recorded successfully, in order.
    pub fn recorded(&self) -> Vec<Address> {
        self.state.lock().unwrap().recorded.clone()
    }

    /// Calls received, successful or not.
    pub fn attempts(&self) -> usize {
        self.state.lock().unwrap().attempts
    }
}

impl GovernanceActionSink for NullGovernanceSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn record_governance_action(&self, who: &Address) -> Result<(), CollaboratorError> {
        let mut state = self.state.lock().unwrap();
        state.attempts += 1;
        if state.failing {
            return Err(CollaboratorError::Unavailable(self.name.clone()));
        }
        state.recorded.push(who.clone());
        Ok(())
    }
}
