//! # Bounded Ring Buffer
//!
//! A fixed array of `N` slots addressed through two unwrapped, monotonically
//! increasing cursors:
//!
//! ```text
//!            read_cursor            write_cursor
//!                 │                       │
//!                 ▼                       ▼
//!   ┌────────┬────────┬────────┬────────┬────────┐
//!   │ claimed│ pending│ pending│ pending│  free  │   slot = position % N
//!   └────────┴────────┴────────┴────────┴────────┘
//! ```
//!
//! The pending count is always `write_cursor - read_cursor`. It is never kept
//! as a separate modular counter, so it cannot drift or wrap negative.
//!
//! A worker *claims* the oldest pending order with [`RingBuffer::take_oldest`],
//! which advances the read cursor and moves the order's completion signal into
//! the in-flight table. The slot itself may then be reused by a later client
//! while the claimed order is still being processed; completion is tracked by
//! position, never by client id.
//!
//! `RingBuffer` does no locking of its own. Callers hold the mutation lock
//! (see [`SharedBuffer`](crate::SharedBuffer)) around every call.

use crate::completion::{Completion, CompletionSender, CompletionTicket};
use crate::error::BufferError;
use crate::order::{ClientId, Order, OrderStatus, WorkerId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Slot {
    order: Option<Order>,
    notify: Option<CompletionSender>,
}

#[derive(Debug)]
struct InFlight {
    client: ClientId,
    notify: Option<CompletionSender>,
}

/// Result of a successful [`RingBuffer::reserve_slot`].
#[derive(Debug)]
pub struct Reservation {
    pub position: u64,
    pub slot: usize,
    pub ticket: CompletionTicket,
}

/// A consistent copy of the buffer's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferSnapshot {
    pub capacity: usize,
    pub write_cursor: u64,
    pub read_cursor: u64,
    pub pending: u64,
    pub in_flight: usize,
    pub completed: u64,
}

/// Fixed-capacity circular store of orders.
#[derive(Debug)]
pub struct RingBuffer {
    slots: Vec<Slot>,
    write_cursor: u64,
    read_cursor: u64,
    in_flight: BTreeMap<u64, InFlight>,
    completed: u64,
}

impl RingBuffer {
    /// Creates an empty buffer with `capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::ZeroCapacity`] when `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        if capacity == 0 {
            return Err(BufferError::ZeroCapacity);
        }
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, Slot::default);
        Ok(Self {
            slots,
            write_cursor: 0,
            read_cursor: 0,
            in_flight: BTreeMap::new(),
            completed: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Orders written but not yet claimed by a worker.
    pub fn pending(&self) -> u64 {
        self.write_cursor - self.read_cursor
    }

    pub fn snapshot(&self) -> BufferSnapshot {
        BufferSnapshot {
            capacity: self.capacity(),
            write_cursor: self.write_cursor,
            read_cursor: self.read_cursor,
            pending: self.pending(),
            in_flight: self.in_flight.len(),
            completed: self.completed,
        }
    }

    fn slot_index(&self, position: u64) -> usize {
        // The modulo keeps the result below `capacity`, which is a usize.
        (position % self.slots.len() as u64) as usize
    }

    /// Writes a pending order for `client` at the write cursor and advances it.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Full`] if every slot holds a pending order. The
    /// admission semaphore makes this unreachable for callers that acquired a
    /// permit first.
    pub fn reserve_slot(&mut self, client: ClientId) -> Result<Reservation, BufferError> {
        if self.pending() >= self.capacity() as u64 {
            return Err(BufferError::Full {
                capacity: self.capacity(),
            });
        }

        let position = self.write_cursor;
        let slot = self.slot_index(position);
        let (sender, ticket) = CompletionTicket::channel(position);
        self.slots[slot] = Slot {
            order: Some(Order::new(client, position)),
            notify: Some(sender),
        };
        self.write_cursor += 1;

        Ok(Reservation {
            position,
            slot,
            ticket,
        })
    }

    /// Claims the oldest pending order and advances the read cursor.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Empty`] when nothing is pending.
    pub fn take_oldest(&mut self) -> Result<Order, BufferError> {
        if self.pending() == 0 {
            return Err(BufferError::Empty);
        }

        let position = self.read_cursor;
        let slot = self.slot_index(position);
        let entry = &mut self.slots[slot];
        let order = match &entry.order {
            Some(order) if order.position == position => order.clone(),
            _ => return Err(BufferError::UnknownPosition(position)),
        };

        self.in_flight.insert(
            position,
            InFlight {
                client: order.client,
                notify: entry.notify.take(),
            },
        );
        self.read_cursor += 1;
        Ok(order)
    }

    /// Marks the claimed order at `position` done and fires its completion
    /// signal.
    ///
    /// # Errors
    ///
    /// - [`BufferError::AlreadyDone`] if the order was already completed.
    /// - [`BufferError::UnknownPosition`] if no order at `position` was claimed.
    pub fn mark_done(&mut self, position: u64, worker: WorkerId) -> Result<ClientId, BufferError> {
        let Some(claimed) = self.in_flight.remove(&position) else {
            return Err(if position < self.read_cursor {
                BufferError::AlreadyDone(position)
            } else {
                BufferError::UnknownPosition(position)
            });
        };

        let slot = self.slot_index(position);
        if let Some(order) = self.slots[slot].order.as_mut() {
            if order.position == position {
                order.status = OrderStatus::Done;
            }
        }
        self.completed += 1;

        if let Some(notify) = claimed.notify {
            // The client may have stopped listening; the status flag still holds.
            let _ = notify.send(Completion {
                position,
                worker: Some(worker),
            });
        }
        Ok(claimed.client)
    }

    /// Whether the order written at `position` has been completed.
    pub fn is_done(&self, position: u64) -> bool {
        position < self.read_cursor && !self.in_flight.contains_key(&position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(RingBuffer::new(0).err(), Some(BufferError::ZeroCapacity));
    }

    #[test]
    fn test_take_oldest_is_fifo() {
        let mut ring = RingBuffer::new(3).unwrap();
        for id in 1..=3 {
            ring.reserve_slot(ClientId(id)).unwrap();
        }

        let taken: Vec<ClientId> = (0..3).map(|_| ring.take_oldest().unwrap().client).collect();
        assert_eq!(taken, vec![ClientId(1), ClientId(2), ClientId(3)]);
        assert_eq!(ring.pending(), 0);
    }

    #[test]
    fn test_take_oldest_on_empty_buffer_is_an_error() {
        let mut ring = RingBuffer::new(2).unwrap();
        assert_eq!(ring.take_oldest(), Err(BufferError::Empty));
    }

    #[test]
    fn test_reserve_on_full_buffer_is_an_error() {
        let mut ring = RingBuffer::new(2).unwrap();
        ring.reserve_slot(ClientId(1)).unwrap();
        ring.reserve_slot(ClientId(2)).unwrap();

        let err = ring.reserve_slot(ClientId(3)).unwrap_err();
        assert_eq!(err, BufferError::Full { capacity: 2 });
        assert_eq!(ring.snapshot().write_cursor, 2);
    }

    #[test]
    fn test_cursors_keep_growing_across_wraparound() {
        let mut ring = RingBuffer::new(2).unwrap();
        for id in 1..=5 {
            let reservation = ring.reserve_slot(ClientId(id)).unwrap();
            assert_eq!(reservation.slot, (id as usize - 1) % 2);
            let order = ring.take_oldest().unwrap();
            ring.mark_done(order.position, WorkerId(1)).unwrap();
        }

        let snapshot = ring.snapshot();
        assert_eq!(snapshot.write_cursor, 5);
        assert_eq!(snapshot.read_cursor, 5);
        assert_eq!(snapshot.pending, 0);
        assert_eq!(snapshot.completed, 5);
    }

    #[test]
    fn test_mark_done_tracks_position_not_client() {
        let mut ring = RingBuffer::new(2).unwrap();
        // Client ids deliberately unrelated to positions.
        ring.reserve_slot(ClientId(9)).unwrap();
        ring.reserve_slot(ClientId(4)).unwrap();
        let first = ring.take_oldest().unwrap();
        let second = ring.take_oldest().unwrap();

        assert_eq!(ring.mark_done(second.position, WorkerId(2)), Ok(ClientId(4)));
        assert!(ring.is_done(1));
        assert!(!ring.is_done(0));

        assert_eq!(ring.mark_done(first.position, WorkerId(1)), Ok(ClientId(9)));
        assert!(ring.is_done(0));
    }

    #[test]
    fn test_mark_done_twice_is_rejected() {
        let mut ring = RingBuffer::new(1).unwrap();
        ring.reserve_slot(ClientId(1)).unwrap();
        let order = ring.take_oldest().unwrap();
        ring.mark_done(order.position, WorkerId(1)).unwrap();

        assert_eq!(
            ring.mark_done(order.position, WorkerId(1)),
            Err(BufferError::AlreadyDone(0))
        );
        assert_eq!(
            ring.mark_done(5, WorkerId(1)),
            Err(BufferError::UnknownPosition(5))
        );
    }

    #[test]
    fn test_slot_reused_while_previous_order_in_flight() {
        let mut ring = RingBuffer::new(1).unwrap();
        ring.reserve_slot(ClientId(1)).unwrap();
        let first = ring.take_oldest().unwrap();

        // The slot was read, so a later client may overwrite it.
        let reservation = ring.reserve_slot(ClientId(2)).unwrap();
        assert_eq!(reservation.slot, 0);
        assert_eq!(ring.snapshot().in_flight, 1);

        assert_eq!(ring.mark_done(first.position, WorkerId(1)), Ok(ClientId(1)));
        assert!(ring.is_done(0));
        assert!(!ring.is_done(1));
    }

    #[tokio::test]
    async fn test_mark_done_fires_ticket() {
        let mut ring = RingBuffer::new(2).unwrap();
        let reservation = ring.reserve_slot(ClientId(1)).unwrap();
        let order = ring.take_oldest().unwrap();
        ring.mark_done(order.position, WorkerId(3)).unwrap();

        let completion = reservation.ticket.wait().await.unwrap();
        assert_eq!(completion.position, 0);
        assert_eq!(completion.worker, Some(WorkerId(3)));
    }
}
