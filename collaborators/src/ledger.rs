//! Job/escrow ledger: holds job funds and moves them on the engine's behalf.

use crate::CollaboratorError;
use athena_types::{Address, DisputeId, JobId};
use serde::{Deserialize, Serialize};

/// The two parties of a job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobParties {
    pub client: Address,
    pub freelancer: Address,
}

impl JobParties {
    pub fn is_party(&self, who: &Address) -> bool {
        *who == self.client || *who == self.freelancer
    }

    /// The other party, if `who` is one of them.
    pub fn counterparty(&self, who: &Address) -> Option<&Address> {
        if *who == self.client {
            Some(&self.freelancer)
        } else if *who == self.freelancer {
            Some(&self.client)
        } else {
            None
        }
    }
}

/// Instruction to pay a dispute winner out of the locked job funds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRequest {
    pub job_id: JobId,
    pub dispute_id: DisputeId,
    pub winner: Address,
    pub loser: Address,
    /// Gross amount released from escrow.
    pub amount: u128,
    /// Platform fee split off before the winner is paid (basis points).
    pub fee_bps: u32,
}

/// The ledger that owns job escrow.
///
/// Implementations use interior mutability: the engine only ever holds a
/// shared reference.
pub trait JobLedger: Send {
    fn job_exists(&self, job_id: &JobId) -> bool;

    /// Parties of a job, `None` if the job does not exist.
    fn job_parties(&self, job_id: &JobId) -> Option<JobParties>;

    /// Lock whatever the job currently holds in escrow for the dispute.
    /// The ledger decides the amount and returns it.
    fn lock_disputed_funds(
        &self,
        job_id: &JobId,
        dispute_id: DisputeId,
    ) -> Result<u128, CollaboratorError>;

    /// Release previously locked funds. `Ok(false)` means the ledger declined.
    fn release_disputed_funds(&self, request: &ReleaseRequest) -> Result<bool, CollaboratorError>;
}
