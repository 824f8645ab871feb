//! # Client Actor
//!
//! A client is a one-shot producer: it places exactly one order, waits until a
//! worker has finished it, and ends.
//!
//! ## Lifecycle
//!
//! 1. Wait on Admission for a free slot.
//! 2. Write the order under the mutation lock (emits `Placed`).
//! 3. Signal Availability, after the lock is released.
//! 4. Wait for *its* order to complete, by signal or by polling.
//! 5. Emit `Received` and return a [`ClientOutcome`].
//!
//! A client never retries or aborts. It only returns an error when the buffer
//! is torn down underneath it or its bookkeeping is broken.
//!
//! ## Usage
//!
//! ```rust
//! use order_buffer::{ClientId, CompletionWait, SharedBuffer, TracingSink, WorkerId};
//! use order_kitchen::client_actor::ClientActor;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let buffer = SharedBuffer::new(1, Arc::new(TracingSink))?;
//!     let client = tokio::spawn(
//!         ClientActor::new(ClientId(1), buffer.clone(), CompletionWait::Signal).run(),
//!     );
//!
//!     // Play the worker by hand
//!     if let Some(order) = buffer.claim(WorkerId(1)).await? {
//!         buffer.finish(WorkerId(1), &order)?;
//!     }
//!
//!     let outcome = client.await??;
//!     assert_eq!(outcome.worker, Some(WorkerId(1)));
//!     Ok(())
//! }
//! ```

use crate::error::KitchenError;
use order_buffer::{ClientId, CompletionWait, OrderEvent, SharedBuffer, WorkerId};
use std::sync::Arc;
use tracing::{debug, instrument};

/// What a client observed about its order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOutcome {
    pub client: ClientId,
    pub position: u64,
    pub worker: Option<WorkerId>,
}

pub struct ClientActor {
    id: ClientId,
    buffer: Arc<SharedBuffer>,
    wait: CompletionWait,
}

impl ClientActor {
    pub fn new(id: ClientId, buffer: Arc<SharedBuffer>, wait: CompletionWait) -> Self {
        Self { id, buffer, wait }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Places the order and waits for it to be completed.
    ///
    /// # Errors
    ///
    /// Returns [`KitchenError::Buffer`] if the buffer is closed before the
    /// order completes.
    #[instrument(name = "client", skip(self), fields(client = %self.id))]
    pub async fn run(self) -> Result<ClientOutcome, KitchenError> {
        debug!("Waiting for a free slot");
        let reservation = self.buffer.place(self.id).await?;
        let position = reservation.position;

        debug!(position, wait = ?self.wait, "Waiting for completion");
        let completion = self
            .buffer
            .await_completion(reservation.ticket, self.wait)
            .await?;

        self.buffer.record(OrderEvent::Received {
            client: self.id,
            position,
            worker: completion.worker,
        });

        Ok(ClientOutcome {
            client: self.id,
            position,
            worker: completion.worker,
        })
    }
}
