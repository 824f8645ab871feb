//! # Order Records
//!
//! The unit of work that travels through the ring buffer, plus the
//! type-safe identifiers of the actors that produce and consume it.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for client actors (producers). Client ids start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientId(pub u32);

impl From<u32> for ClientId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "client_{}", self.0)
    }
}

/// Type-safe identifier for worker actors (consumers). Worker ids start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkerId(pub u32);

impl From<u32> for WorkerId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "worker_{}", self.0)
    }
}

/// Completion state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Done,
}

/// An order stored in a ring buffer slot.
///
/// `position` is the unwrapped logical cursor value the order was written at;
/// the physical slot is `position % capacity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub client: ClientId,
    pub position: u64,
    pub status: OrderStatus,
}

impl Order {
    /// Creates a new pending order for `client` at `position`.
    pub fn new(client: ClientId, position: u64) -> Self {
        Self {
            client,
            position,
            status: OrderStatus::Pending,
        }
    }
}
