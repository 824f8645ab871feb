//! # Order Buffer
//!
//! The synchronization core of a bounded producer/consumer system: a
//! fixed-capacity circular queue of orders written by many client actors and
//! drained by many worker actors, such that no slot is overwritten before it
//! was read and no worker starves while work exists.
//!
//! ## Architecture Overview
//!
//! The crate is layered bottom-up:
//!
//! 1. **Storage** ([`RingBuffer`]) - slots, unwrapped cursors and completion bookkeeping.
//!    No locking; the caller holds the lock.
//! 2. **Gating** ([`BoundedSemaphore`]) - Admission counts free slots, Availability counts
//!    pending orders. Both live in `[0, capacity]`.
//! 3. **Coordination** ([`SharedBuffer`]) - the ring behind the mutation lock plus both
//!    semaphores, exposing the `place` / `claim` / `finish` protocol actors use.
//!
//! Around the core sit:
//!
//! - [`CompletionTicket`] / [`CompletionWait`] - how a client learns *its* order is done.
//! - [`OrderEvent`] / [`EventSink`] - observable side effects ([`TracingSink`], [`RecordingSink`]).
//! - [`ShutdownSignal`] - explicit stop for worker actors, which otherwise run forever.
//!
//! ## Invariants
//!
//! - `pending = write_cursor - read_cursor`, always in `[0, capacity]`.
//! - Availability level never exceeds pending; Admission never exceeds capacity.
//! - Orders are claimed in the order they were placed (FIFO).
//! - Each order is claimed exactly once and marked done exactly once, by position.
//!
//! ## Example
//!
//! ```rust
//! use order_buffer::{ClientId, CompletionWait, SharedBuffer, TracingSink, WorkerId};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), order_buffer::BufferError> {
//!     let buffer = SharedBuffer::new(2, Arc::new(TracingSink))?;
//!
//!     // Client side
//!     let reservation = buffer.place(ClientId(1)).await?;
//!
//!     // Worker side
//!     if let Some(order) = buffer.claim(WorkerId(1)).await? {
//!         buffer.finish(WorkerId(1), &order)?;
//!     }
//!
//!     let done = buffer
//!         .await_completion(reservation.ticket, CompletionWait::Signal)
//!         .await?;
//!     assert_eq!(done.worker, Some(WorkerId(1)));
//!     Ok(())
//! }
//! ```

pub mod completion;
pub mod error;
pub mod events;
pub mod order;
pub mod recorder;
pub mod ring;
pub mod semaphore;
pub mod shared;
pub mod shutdown;
pub mod tracing;

// Re-export core types for convenience
pub use completion::{Completion, CompletionTicket, CompletionWait};
pub use error::BufferError;
pub use events::{EventSink, OrderEvent, TracingSink};
pub use order::{ClientId, Order, OrderStatus, WorkerId};
pub use recorder::RecordingSink;
pub use ring::{BufferSnapshot, Reservation, RingBuffer};
pub use semaphore::BoundedSemaphore;
pub use shared::SharedBuffer;
pub use shutdown::{ShutdownListener, ShutdownSignal};
