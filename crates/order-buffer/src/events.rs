//! # Order Events
//!
//! Observable side effects of the coordination protocol. They are not part of
//! the synchronization contract: actors report them to an [`EventSink`] and
//! carry on.
//!
//! `Placed` and `ProcessingStarted` are recorded while the mutation lock is
//! held, so the order in which a sink sees them matches cursor order.

use crate::order::{ClientId, WorkerId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    Placed {
        client: ClientId,
        position: u64,
        slot: usize,
    },
    ProcessingStarted {
        worker: WorkerId,
        client: ClientId,
        position: u64,
    },
    ProcessingFinished {
        worker: WorkerId,
        client: ClientId,
        position: u64,
    },
    Received {
        client: ClientId,
        position: u64,
        worker: Option<WorkerId>,
    },
    AllProcessed {
        total: usize,
    },
}

/// Destination for [`OrderEvent`]s.
///
/// `record` runs under the mutation lock for `Placed`, `ProcessingStarted` and
/// `ProcessingFinished`, so implementations must be cheap and must not call
/// back into the buffer.
pub trait EventSink: Send + Sync + 'static {
    fn record(&self, event: OrderEvent);
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn record(&self, event: OrderEvent) {
        (**self).record(event);
    }
}

/// Writes every event as a structured `info` line.
///
/// The line is formatted and handed to the subscriber while the mutation lock
/// is held, so a slow subscriber lengthens every critical section. Keeping the
/// write under the lock is what makes the log order match cursor order.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: OrderEvent) {
        match event {
            OrderEvent::Placed {
                client,
                position,
                slot,
            } => info!(%client, position, slot, "Order placed"),
            OrderEvent::ProcessingStarted {
                worker,
                client,
                position,
            } => info!(%worker, %client, position, "Preparing order"),
            OrderEvent::ProcessingFinished {
                worker,
                client,
                position,
            } => info!(%worker, %client, position, "Order finished"),
            OrderEvent::Received {
                client,
                position,
                worker,
            } => match worker {
                Some(worker) => info!(%client, position, %worker, "Order received"),
                None => info!(%client, position, "Order received"),
            },
            OrderEvent::AllProcessed { total } => info!(total, "All orders processed"),
        }
    }
}
