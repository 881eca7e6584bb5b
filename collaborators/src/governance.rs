//! Governance-action trackers.
//!
//! Each successful vote earns the voter one participation credit, recorded
//! by whichever tracker answers first: the central action tracker, the
//! native governance contract, or the legacy DAO.

use crate::CollaboratorError;
use athena_types::Address;

/// Something that can record one governance action for an identity.
pub trait GovernanceActionSink: Send {
    /// Name used in logs and events.
    fn name(&self) -> &str;

    fn record_governance_action(&self, who: &Address) -> Result<(), CollaboratorError>;
}
