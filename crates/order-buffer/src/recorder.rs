//! # Recording Sink
//!
//! An in-memory [`EventSink`] for tests and diagnostics. It keeps every event
//! in arrival order and can forward each one to another sink, so a test run
//! can both assert on the event stream and still print it.
//!
//! ```rust
//! use order_buffer::{ClientId, EventSink, OrderEvent, RecordingSink};
//!
//! let sink = RecordingSink::new();
//! sink.record(OrderEvent::Placed { client: ClientId(1), position: 0, slot: 0 });
//!
//! assert_eq!(sink.placed(), vec![ClientId(1)]);
//! ```

use crate::events::{EventSink, OrderEvent};
use crate::order::ClientId;
use parking_lot::Mutex;

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<OrderEvent>>,
    forward: Option<Box<dyn EventSink>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records events and also passes each one on to `sink`.
    pub fn forwarding_to(sink: impl EventSink) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            forward: Some(Box::new(sink)),
        }
    }

    /// Copy of every event recorded so far.
    pub fn events(&self) -> Vec<OrderEvent> {
        self.events.lock().clone()
    }

    /// Clients in the order their orders were placed.
    pub fn placed(&self) -> Vec<ClientId> {
        self.collect(|event| match event {
            OrderEvent::Placed { client, .. } => Some(*client),
            _ => None,
        })
    }

    /// Clients in the order workers started processing their orders.
    pub fn started(&self) -> Vec<ClientId> {
        self.collect(|event| match event {
            OrderEvent::ProcessingStarted { client, .. } => Some(*client),
            _ => None,
        })
    }

    /// Clients in the order they received their completed orders.
    pub fn received(&self) -> Vec<ClientId> {
        self.collect(|event| match event {
            OrderEvent::Received { client, .. } => Some(*client),
            _ => None,
        })
    }

    fn collect<T>(&self, pick: impl Fn(&OrderEvent) -> Option<T>) -> Vec<T> {
        self.events.lock().iter().filter_map(pick).collect()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: OrderEvent) {
        if let Some(forward) = &self.forward {
            forward.record(event.clone());
        }
        self.events.lock().push(event);
    }
}
