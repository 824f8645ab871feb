//! # Worker Actor
//!
//! A worker is a long-running consumer. It has no natural end: it keeps
//! claiming the oldest pending order until the coordinator triggers shutdown
//! or closes the buffer.
//!
//! ## Loop
//!
//! 1. Wait on Availability (or shutdown, whichever comes first).
//! 2. Under the mutation lock, re-check the pending count and claim the oldest
//!    order. A wake that finds nothing pending is skipped.
//! 3. Process the order with no lock held.
//! 4. Under the lock, mark it done; then signal Admission.
//!
//! Admission is signalled once per wake, including skipped ones, so every
//! Availability-driven wake hands back one slot. The bounded semaphore refuses
//! a release that would exceed capacity.
//!
//! A skipped wake cannot happen through the public [`SharedBuffer`] API:
//! Availability is only released by `place`, after the order is written. The
//! `Ok(None)` branch guards against that accounting being broken.
//!
//! Shutdown is only observed between orders. An order that has been claimed is
//! always processed and finished.

use crate::error::KitchenError;
use crate::processor::OrderProcessor;
use order_buffer::{BufferError, SharedBuffer, ShutdownListener, WorkerId};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Totals for one worker, returned when it stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker: WorkerId,
    pub processed: u64,
    pub spurious_wakes: u64,
}

pub struct WorkerActor {
    id: WorkerId,
    buffer: Arc<SharedBuffer>,
    processor: Arc<dyn OrderProcessor>,
    shutdown: ShutdownListener,
}

impl WorkerActor {
    pub fn new(
        id: WorkerId,
        buffer: Arc<SharedBuffer>,
        processor: Arc<dyn OrderProcessor>,
        shutdown: ShutdownListener,
    ) -> Self {
        Self {
            id,
            buffer,
            processor,
            shutdown,
        }
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Runs the worker loop until shutdown.
    ///
    /// # Errors
    ///
    /// Returns [`KitchenError::Buffer`] when the buffer's bookkeeping is
    /// found broken. A closed buffer is a normal stop, not an error.
    #[instrument(name = "worker", skip(self), fields(worker = %self.id))]
    pub async fn run(mut self) -> Result<WorkerReport, KitchenError> {
        info!("Worker started");
        let mut report = WorkerReport {
            worker: self.id,
            processed: 0,
            spurious_wakes: 0,
        };

        loop {
            let claimed = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                claimed = self.buffer.claim(self.id) => claimed,
            };

            match claimed {
                Ok(Some(order)) => {
                    self.processor.process(self.id, &order).await;
                    if let Err(e) = self.buffer.finish(self.id, &order) {
                        error!(error = %e, position = order.position, "Failed to finish order");
                        return Err(e.into());
                    }
                    report.processed += 1;
                }
                Ok(None) => {
                    warn!("Woken with no pending order");
                    report.spurious_wakes += 1;
                    if let Err(e) = self.buffer.release_admission() {
                        debug!(error = %e, "Admission already full");
                    }
                }
                Err(BufferError::Closed(_)) => break,
                Err(e) => {
                    error!(error = %e, "Failed to claim order");
                    return Err(e.into());
                }
            }
        }

        info!(processed = report.processed, "Worker stopped");
        Ok(report)
    }
}
