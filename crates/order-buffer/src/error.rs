//! # Buffer Errors
//!
//! This module defines the error type shared by the ring buffer, the bounded
//! semaphores and the shared buffer. Most variants signal a broken invariant
//! rather than a recoverable condition: under the admission/availability
//! protocol none of them is reachable during normal operation.

/// Errors raised by the synchronization core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("Buffer capacity must be at least 1")]
    ZeroCapacity,
    #[error("Buffer capacity {requested} exceeds the semaphore limit of {max}")]
    CapacityTooLarge { requested: usize, max: usize },
    #[error("Buffer is full ({capacity} orders pending)")]
    Full { capacity: usize },
    #[error("No pending order to take")]
    Empty,
    #[error("No claimed order at position {0}")]
    UnknownPosition(u64),
    #[error("Order at position {0} is already done")]
    AlreadyDone(u64),
    #[error("{name} semaphore is already at its capacity of {capacity}")]
    Overflow { name: &'static str, capacity: usize },
    #[error("{0} semaphore closed")]
    Closed(&'static str),
    #[error("Completion signal for position {0} was dropped")]
    CompletionDropped(u64),
}
