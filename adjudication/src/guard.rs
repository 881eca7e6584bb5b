//! Non-reentrant guard for transfer-triggering entry points.

use crate::AdjudicationError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag marking a transfer in progress. Clones share the flag.
#[derive(Clone, Debug, Default)]
pub struct TransferLock {
    busy: Arc<AtomicBool>,
}

impl TransferLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the critical section. Fails if a transfer is already running.
    pub fn enter(&self) -> Result<TransferGuard, AdjudicationError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AdjudicationError::Reentrant)?;
        Ok(TransferGuard {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the lock when dropped, on success and error paths alike.
#[derive(Debug)]
pub struct TransferGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for TransferGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_entry_is_rejected() {
        let lock = TransferLock::new();
        let guard = lock.enter().unwrap();
        assert!(lock.is_busy());
        assert!(matches!(lock.clone().enter(), Err(AdjudicationError::Reentrant)));
        drop(guard);
        assert!(!lock.is_busy());
        assert!(lock.enter().is_ok());
    }
}
