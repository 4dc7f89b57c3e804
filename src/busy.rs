use crate::error::{BudgetError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Allows at most one call in flight per control (assistant button, consultancy modal, export).
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    busy: Arc<AtomicBool>,
}

/// Clears the flag when dropped, whether the call succeeded or failed.
#[derive(Debug)]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn try_acquire(&self, operation: &'static str) -> Result<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| BudgetError::OperationInFlight(operation))?;
        Ok(BusyGuard {
            busy: Arc::clone(&self.busy),
        })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
