//! Error types for the kitchen actors and coordinator.

use order_buffer::BufferError;
use thiserror::Error;

/// Errors that can occur while configuring or running a kitchen.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum KitchenError {
    /// The configuration cannot produce a working kitchen.
    #[error("Invalid kitchen configuration: {0}")]
    InvalidConfig(String),

    /// The shared buffer refused an operation.
    #[error("Order buffer error: {0}")]
    Buffer(#[from] BufferError),

    /// An actor task panicked or was aborted.
    #[error("Actor task failed: {0}")]
    TaskFailed(String),
}
