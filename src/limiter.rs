//! FIFO concurrency gate for batch work.
//!
//! Built on tokio's semaphore, which is fair: waiters are admitted in the
//! order they started waiting. A `Slot` returns its capacity on drop, so a
//! unit that errors or panics cannot leak capacity.

use crate::constants::{MAX_CONCURRENCY, MIN_CONCURRENCY};
use crate::error::{CompressionError, Result};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Concurrency for a run: `requested`, or the host CPU count, clamped to
/// `MIN_CONCURRENCY..=MAX_CONCURRENCY`.
pub fn resolve_concurrency(requested: Option<usize>) -> usize {
    requested
        .unwrap_or_else(num_cpus::get)
        .clamp(MIN_CONCURRENCY, MAX_CONCURRENCY)
}

#[derive(Debug, Clone)]
pub struct Limiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// Admission ticket held for the duration of one unit of work.
#[derive(Debug)]
pub struct Slot {
    _permit: OwnedSemaphorePermit,
}

impl Limiter {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CompressionError::InvalidConcurrency(capacity));
        }
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots not currently held.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Waits until a slot is free. Callers are admitted in the order they call.
    pub async fn admit(&self) -> Result<Slot> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| CompressionError::LimiterClosed)?;
        Ok(Slot { _permit: permit })
    }
}
