//! Nullable job ledger: in-memory escrow.

use athena_collaborators::{CollaboratorError, JobLedger, JobParties, ReleaseRequest};
use athena_types::{Address, DisputeId, JobId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One job held by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullJob {
    pub parties: JobParties,
    /// Funds currently held in escrow.
    pub escrow: u128,
    /// Dispute the escrow is locked for, if any.
    pub locked_for: Option<DisputeId>,
}

#[derive(Default)]
struct LedgerState {
    jobs: HashMap<JobId, NullJob>,
    releases: Vec<ReleaseRequest>,
    paid: HashMap<Address, u128>,
    platform_fees: u128,
    fail_lock: bool,
    fail_release: bool,
    decline_release: bool,
}

/// An in-memory job ledger for testing.
#[derive(Clone, Default)]
pub struct NullJobLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl NullJobLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a job with funds in escrow.
    pub fn add_job(&self, job_id: &JobId, client: &Address, freelancer: &Address, escrow: u128) {
        self.state.lock().unwrap().jobs.insert(
            job_id.clone(),
            NullJob {
                parties: JobParties {
                    client: client.clone(),
                    freelancer: freelancer.clone(),
                },
                escrow,
                locked_for: None,
            },
        );
    }

    pub fn job(&self, job_id: &JobId) -> Option<NullJob> {
        self.state.lock().unwrap().jobs.get(job_id).cloned()
    }

    /// Every release the ledger accepted, in order.
    pub fn releases(&self) -> Vec<ReleaseRequest> {
        self.state.lock().unwrap().releases.clone()
    }

    /// Net amount paid out to `who` across all releases.
    pub fn paid_to(&self, who: &Address) -> u128 {
        self.state.lock().unwrap().paid.get(who).copied().unwrap_or(0)
    }

    /// Platform fees split off across all releases.
    pub fn platform_fees(&self) -> u128 {
        self.state.lock().unwrap().platform_fees
    }

    /// Make every lock attempt fail.
    pub fn fail_locks(&self, fail: bool) {
        self.state.lock().unwrap().fail_lock = fail;
    }

    /// Make every release attempt fail with an error.
    pub fn fail_releases(&self, fail: bool) {
        self.state.lock().unwrap().fail_release = fail;
    }

    /// Make every release attempt return `Ok(false)`.
    pub fn decline_releases(&self, decline: bool) {
        self.state.lock().unwrap().decline_release = decline;
    }
}

impl JobLedger for NullJobLedger {
    fn job_exists(&self, job_id: &JobId) -> bool {
        self.state.lock().unwrap().jobs.contains_key(job_id)
    }

    fn job_parties(&self, job_id: &JobId) -> Option<JobParties> {
        self.state
            .lock()
            .unwrap()
            .jobs
            .get(job_id)
            .map(|j| j.parties.clone())
    }

    fn lock_disputed_funds(
        &self,
        job_id: &JobId,
        dispute_id: DisputeId,
    ) -> Result<u128, CollaboratorError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_lock {
            return Err(CollaboratorError::Unavailable("job ledger".into()));
        }
        let job = state
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| CollaboratorError::Rejected(format!("unknown job {}", job_id)))?;
        if let Some(existing) = job.locked_for {
            return Err(CollaboratorError::Rejected(format!(
                "job {} already locked for {}",
                job_id, existing
            )));
        }
        job.locked_for = Some(dispute_id);
        Ok(job.escrow)
    }

    fn release_disputed_funds(&self, request: &ReleaseRequest) -> Result<bool, CollaboratorError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_release {
            return Err(CollaboratorError::Unavailable("job ledger".into()));
        }
        if state.decline_release {
            return Ok(false);
        }
        let job = state.jobs.get_mut(&request.job_id).ok_or_else(|| {
            CollaboratorError::Rejected(format!("unknown job {}", request.job_id))
        })?;
        if job.locked_for != Some(request.dispute_id) {
            return Err(CollaboratorError::Rejected(format!(
                "job {} is not locked for {}",
                request.job_id, request.dispute_id
            )));
        }
        if request.amount > job.escrow {
            return Err(CollaboratorError::InsufficientFunds {
                needed: request.amount,
                available: job.escrow,
            });
        }
        job.escrow -= request.amount;
        job.locked_for = None;

        let fee = request.amount * u128::from(request.fee_bps) / 10_000;
        *state.paid.entry(request.winner.clone()).or_insert(0) += request.amount - fee;
        state.platform_fees += fee;
        state.releases.push(request.clone());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(s)
    }

    #[test]
    fn lock_returns_escrow_once() {
        let ledger = NullJobLedger::new();
        let job = JobId::new("job-1");
        ledger.add_job(&job, &addr("0xc1"), &addr("0xf1"), 1_000);

        assert_eq!(ledger.lock_disputed_funds(&job, DisputeId::new(1)).unwrap(), 1_000);
        assert!(ledger.lock_disputed_funds(&job, DisputeId::new(2)).is_err());
    }

    #[test]
    fn release_pays_winner_net_of_fee() {
        let ledger = NullJobLedger::new();
        let job = JobId::new("job-1");
        ledger.add_job(&job, &addr("0xc1"), &addr("0xf1"), 1_000);
        ledger.lock_disputed_funds(&job, DisputeId::new(1)).unwrap();

        let released = ledger
            .release_disputed_funds(&ReleaseRequest {
                job_id: job.clone(),
                dispute_id: DisputeId::new(1),
                winner: addr("0xf1"),
                loser: addr("0xc1"),
                amount: 1_000,
                fee_bps: 500,
            })
            .unwrap();

        assert!(released);
        assert_eq!(ledger.paid_to(&addr("0xf1")), 950);
        assert_eq!(ledger.platform_fees(), 50);
        assert_eq!(ledger.job(&job).unwrap().escrow, 0);
    }

    #[test]
    fn declined_release_changes_nothing() {
        let ledger = NullJobLedger::new();
        let job = JobId::new("job-1");
        ledger.add_job(&job, &addr("0xc1"), &addr("0xf1"), 1_000);
        ledger.lock_disputed_funds(&job, DisputeId::new(1)).unwrap();
        ledger.decline_releases(true);

        let request = ReleaseRequest {
            job_id: job.clone(),
            dispute_id: DisputeId::new(1),
            winner: addr("0xf1"),
            loser: addr("0xc1"),
            amount: 1_000,
            fee_bps: 0,
        };
        assert!(!ledger.release_disputed_funds(&request).unwrap());
        assert!(ledger.releases().is_empty());
        assert_eq!(ledger.job(&job).unwrap().escrow, 1_000);
    }
}
