//! # Completion Tickets
//!
//! A client learns that *its* order is done through a [`CompletionTicket`].
//! Every reservation creates a one-shot channel: the sender travels with the
//! order through the ring buffer and is fired by the worker that marks the
//! order done, the receiver stays with the client.
//!
//! Two waiting strategies are supported, selected with [`CompletionWait`]:
//!
//! - [`CompletionWait::Signal`] suspends on the one-shot channel. No polling.
//! - [`CompletionWait::Poll`] re-checks the order's status under the mutation
//!   lock with a fixed sleep between checks. See
//!   [`SharedBuffer::await_completion`](crate::SharedBuffer::await_completion).

use crate::error::BufferError;
use crate::order::WorkerId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::oneshot;

pub(crate) type CompletionSender = oneshot::Sender<Completion>;

/// Notice delivered to a client once its order is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub position: u64,
    /// The worker that processed the order. Unknown when the completion was
    /// observed by polling and the signal was not delivered.
    pub worker: Option<WorkerId>,
}

/// How a client waits for its order to complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompletionWait {
    /// Suspend on the order's own completion signal.
    #[default]
    Signal,
    /// Re-check the order status every `interval`.
    Poll { interval: Duration },
}

/// The client's handle on the completion of one order.
#[derive(Debug)]
pub struct CompletionTicket {
    position: u64,
    receiver: oneshot::Receiver<Completion>,
}

impl CompletionTicket {
    pub(crate) fn channel(position: u64) -> (CompletionSender, Self) {
        let (sender, receiver) = oneshot::channel();
        (sender, Self { position, receiver })
    }

    /// Logical position of the order this ticket belongs to.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Suspends until the order is marked done.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::CompletionDropped`] if the order's signal was
    /// dropped without being fired (the buffer was torn down first).
    pub async fn wait(self) -> Result<Completion, BufferError> {
        let position = self.position;
        self.receiver
            .await
            .map_err(|_| BufferError::CompletionDropped(position))
    }

    /// Non-blocking check of the completion signal.
    pub(crate) fn try_take(&mut self) -> Option<Completion> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_resolves_when_sender_fires() {
        let (sender, ticket) = CompletionTicket::channel(7);
        assert_eq!(ticket.position(), 7);

        sender
            .send(Completion {
                position: 7,
                worker: Some(WorkerId(2)),
            })
            .unwrap();

        let completion = ticket.wait().await.unwrap();
        assert_eq!(completion.worker, Some(WorkerId(2)));
    }

    #[tokio::test]
    async fn test_wait_fails_when_sender_dropped() {
        let (sender, ticket) = CompletionTicket::channel(3);
        drop(sender);

        let result = ticket.wait().await;
        assert_eq!(result, Err(BufferError::CompletionDropped(3)));
    }

    #[test]
    fn test_default_wait_is_signal() {
        assert_eq!(CompletionWait::default(), CompletionWait::Signal);
    }
}
