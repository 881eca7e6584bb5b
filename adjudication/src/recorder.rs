//! Governance-action recording with ordered fallback.
//!
//! Sinks are tried in the order they were added (tracker, native governance,
//! legacy DAO). The first success stops the chain. Failures never reach the
//! caller: an unrecorded action only means under-counted participation.

use athena_collaborators::GovernanceActionSink;
use athena_types::Address;
use tracing::debug;

#[derive(Default)]
pub struct RecorderChain {
    sinks: Vec<Box<dyn GovernanceActionSink>>,
}

impl RecorderChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sink at the end of the chain.
    pub fn with_sink(mut self, sink: Box<dyn GovernanceActionSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn push(&mut self, sink: Box<dyn GovernanceActionSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Record one action for `who`. Returns the name of the sink that took
    /// it, or `None` if every sink failed (or there are none).
    pub fn record(&self, who: &Address) -> Option<String> {
        for sink in &self.sinks {
            match sink.record_governance_action(who) {
                Ok(()) => {
                    debug!(%who, sink = sink.name(), "governance action recorded");
                    return Some(sink.name().to_string());
                }
                Err(e) => {
                    debug!(%who, sink = sink.name(), error = %e, "governance sink failed, falling back");
                }
            }
        }
        debug!(%who, "governance action not recorded");
        None
    }
}
