//! # Shared Buffer
//!
//! The one piece of shared mutable state in the system: a [`RingBuffer`]
//! behind the mutation lock, plus the Admission and Availability semaphores
//! that gate access to it. The coordinator creates it and every actor holds
//! an `Arc<SharedBuffer>`.
//!
//! ## Protocol
//!
//! ```text
//! client:  acquire Admission ─► lock ─► reserve slot ─► unlock ─► release Availability
//! worker:  acquire Availability ─► lock ─► take oldest ─► unlock
//!          ─► process (no lock held)
//!          ─► lock ─► mark done ─► unlock ─► release Admission
//! ```
//!
//! The lock is a synchronous `parking_lot::Mutex` and is only held for
//! bookkeeping. It is never held across a semaphore wait, a completion wait or
//! the processing of an order.

use crate::completion::{Completion, CompletionTicket, CompletionWait};
use crate::error::BufferError;
use crate::events::{EventSink, OrderEvent};
use crate::order::{ClientId, Order, WorkerId};
use crate::ring::{BufferSnapshot, Reservation, RingBuffer};
use crate::semaphore::BoundedSemaphore;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

pub struct SharedBuffer {
    ring: Mutex<RingBuffer>,
    admission: BoundedSemaphore,
    availability: BoundedSemaphore,
    sink: Arc<dyn EventSink>,
}

impl SharedBuffer {
    /// Creates the buffer with all `capacity` slots free.
    ///
    /// # Errors
    ///
    /// Fails when `capacity` is 0 or too large for the semaphores.
    pub fn new(capacity: usize, sink: Arc<dyn EventSink>) -> Result<Arc<Self>, BufferError> {
        let ring = RingBuffer::new(capacity)?;
        let admission = BoundedSemaphore::new("admission", capacity, capacity)?;
        let availability = BoundedSemaphore::new("availability", 0, capacity)?;
        Ok(Arc::new(Self {
            ring: Mutex::new(ring),
            admission,
            availability,
            sink,
        }))
    }

    pub fn capacity(&self) -> usize {
        self.admission.capacity()
    }

    /// Places an order for `client`, waiting for a free slot first.
    ///
    /// Availability is signalled only after the lock is released, so a woken
    /// worker always finds the order written.
    ///
    /// # Errors
    ///
    /// [`BufferError::Closed`] after [`close`](Self::close); anything else
    /// means the slot accounting is broken.
    pub async fn place(&self, client: ClientId) -> Result<Reservation, BufferError> {
        self.admission.acquire().await?;

        let reserved = {
            let mut ring = self.ring.lock();
            ring.reserve_slot(client).inspect(|reservation| {
                self.sink.record(OrderEvent::Placed {
                    client,
                    position: reservation.position,
                    slot: reservation.slot,
                });
                debug!(%client, pending = ring.pending(), "Slot reserved");
            })
        };

        let reservation = match reserved {
            Ok(reservation) => reservation,
            Err(e) => {
                // Give the slot back; the order never made it in.
                let _ = self.admission.release();
                return Err(e);
            }
        };

        self.availability.release()?;
        Ok(reservation)
    }

    /// Waits for an order to become available and claims the oldest one.
    ///
    /// Returns `Ok(None)` on a spurious wake: the pending count is re-checked
    /// under the lock and found to be zero. The caller then owes Admission a
    /// release (see [`release_admission`](Self::release_admission)).
    ///
    /// # Errors
    ///
    /// [`BufferError::Closed`] after [`close`](Self::close).
    pub async fn claim(&self, worker: WorkerId) -> Result<Option<Order>, BufferError> {
        self.availability.acquire().await?;

        let mut ring = self.ring.lock();
        if ring.pending() == 0 {
            return Ok(None);
        }
        let order = ring.take_oldest()?;
        self.sink.record(OrderEvent::ProcessingStarted {
            worker,
            client: order.client,
            position: order.position,
        });
        debug!(%worker, pending = ring.pending(), "Order claimed");
        Ok(Some(order))
    }

    /// Marks a claimed order done and frees its slot for the next client.
    ///
    /// Admission is released only when the order was actually marked done, so
    /// a failed or repeated finish never hands out a slot that is not free.
    ///
    /// # Errors
    ///
    /// Propagates [`RingBuffer::mark_done`] failures, or
    /// [`BufferError::Overflow`] if Admission is already full.
    pub fn finish(&self, worker: WorkerId, order: &Order) -> Result<(), BufferError> {
        {
            let mut ring = self.ring.lock();
            let client = ring.mark_done(order.position, worker)?;
            self.sink.record(OrderEvent::ProcessingFinished {
                worker,
                client,
                position: order.position,
            });
        }
        self.admission.release()
    }

    /// Releases Admission without finishing an order.
    ///
    /// # Errors
    ///
    /// [`BufferError::Overflow`] if Admission is already at capacity.
    pub fn release_admission(&self) -> Result<(), BufferError> {
        self.admission.release()
    }

    /// Waits until the order behind `ticket` is done.
    ///
    /// # Errors
    ///
    /// [`BufferError::CompletionDropped`] if the signal is lost, or
    /// [`BufferError::Closed`] if the buffer is closed while polling.
    pub async fn await_completion(
        &self,
        ticket: CompletionTicket,
        wait: CompletionWait,
    ) -> Result<Completion, BufferError> {
        let interval = match wait {
            CompletionWait::Signal => return ticket.wait().await,
            CompletionWait::Poll { interval } => interval,
        };

        let mut ticket = ticket;
        let position = ticket.position();
        loop {
            if self.is_done(position) {
                let worker = ticket.try_take().and_then(|completion| completion.worker);
                return Ok(Completion { position, worker });
            }
            if self.admission.is_closed() {
                return Err(BufferError::Closed(self.admission.name()));
            }
            tokio::time::sleep(interval).await;
        }
    }

    pub fn is_done(&self, position: u64) -> bool {
        self.ring.lock().is_done(position)
    }

    pub fn pending(&self) -> u64 {
        self.ring.lock().pending()
    }

    pub fn snapshot(&self) -> BufferSnapshot {
        self.ring.lock().snapshot()
    }

    /// Free slots as counted by the Admission semaphore.
    pub fn admission_level(&self) -> usize {
        self.admission.level()
    }

    /// Unclaimed orders as counted by the Availability semaphore.
    pub fn availability_level(&self) -> usize {
        self.availability.level()
    }

    pub fn record(&self, event: OrderEvent) {
        self.sink.record(event);
    }

    /// Closes both semaphores. Blocked actors wake with [`BufferError::Closed`].
    pub fn close(&self) {
        self.admission.close();
        self.availability.close();
    }
}
