//! # Bounded Counting Semaphores
//!
//! Admission (free slots) and Availability (pending orders) are both counting
//! semaphores whose count lives in `[0, capacity]`. Permits are *handed over*
//! between actors: a client acquires Admission and releases Availability, a
//! worker acquires Availability and releases Admission. The tokio permit is
//! therefore forgotten on acquire and re-created on release.
//!
//! `tokio::sync::Semaphore` has no upper bound, so the logical `level` is
//! tracked next to it and a release that would push the count past
//! `capacity` is refused.

use crate::error::BufferError;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;
use tracing::warn;

/// A counting semaphore with a hard ceiling.
#[derive(Debug)]
pub struct BoundedSemaphore {
    name: &'static str,
    capacity: usize,
    // Released-but-not-yet-acquired permits. Raised before the tokio permit is
    // added and lowered after it is taken, so it never undercounts the inner
    // semaphore.
    level: AtomicUsize,
    inner: Semaphore,
}

impl BoundedSemaphore {
    /// Creates a semaphore holding `initial` of at most `capacity` permits.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::CapacityTooLarge`] if `capacity` exceeds what
    /// the underlying semaphore supports, and [`BufferError::Overflow`] if
    /// `initial > capacity`.
    pub fn new(name: &'static str, initial: usize, capacity: usize) -> Result<Self, BufferError> {
        if capacity > Semaphore::MAX_PERMITS {
            return Err(BufferError::CapacityTooLarge {
                requested: capacity,
                max: Semaphore::MAX_PERMITS,
            });
        }
        if initial > capacity {
            return Err(BufferError::Overflow { name, capacity });
        }
        Ok(Self {
            name,
            capacity,
            level: AtomicUsize::new(initial),
            inner: Semaphore::new(initial),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current logical count.
    pub fn level(&self) -> usize {
        self.level.load(Ordering::Acquire)
    }

    /// Suspends until a permit is available and consumes it.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Closed`] once [`close`](Self::close) was called.
    pub async fn acquire(&self) -> Result<(), BufferError> {
        let permit = self
            .inner
            .acquire()
            .await
            .map_err(|_| BufferError::Closed(self.name))?;
        // Handed to another actor; it comes back through `release`.
        permit.forget();
        self.level.fetch_sub(1, Ordering::AcqRel);
        Ok(())
    }

    /// Adds one permit, waking at most one waiter.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Overflow`] without adding a permit when the
    /// count is already at capacity.
    pub fn release(&self) -> Result<(), BufferError> {
        let raised = self
            .level
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |level| {
                (level < self.capacity).then_some(level + 1)
            });
        if raised.is_err() {
            warn!(semaphore = self.name, capacity = self.capacity, "Release refused, already at capacity");
            return Err(BufferError::Overflow {
                name: self.name,
                capacity: self.capacity,
            });
        }
        self.inner.add_permits(1);
        Ok(())
    }

    /// Closes the semaphore; pending and future acquisitions fail.
    pub fn close(&self) {
        self.inner.close();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}
