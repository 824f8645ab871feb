//! # Shutdown Signal
//!
//! Workers have no natural end: they wait for orders forever. The coordinator
//! keeps a [`ShutdownSignal`] and hands a [`ShutdownListener`] to every worker
//! so it can stop them explicitly once the last client is done.

use tokio::sync::watch;

/// Owner side of the shutdown broadcast.
#[derive(Debug)]
pub struct ShutdownSignal {
    sender: watch::Sender<bool>,
}

/// Actor side of the shutdown broadcast. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    receiver: watch::Receiver<bool>,
}

/// Creates a connected signal/listener pair. Further listeners come from
/// [`ShutdownSignal::listener`].
pub fn channel() -> (ShutdownSignal, ShutdownListener) {
    let (sender, receiver) = watch::channel(false);
    (ShutdownSignal { sender }, ShutdownListener { receiver })
}

impl ShutdownSignal {
    /// Tells every listener to stop.
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }

    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            receiver: self.sender.subscribe(),
        }
    }
}

impl ShutdownListener {
    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once shutdown is triggered or the signal is dropped.
    pub async fn cancelled(&mut self) {
        // An Err means the sender is gone, which also ends the wait.
        let _ = self.receiver.wait_for(|stop| *stop).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_reaches_every_listener() {
        let (signal, first) = channel();
        let second = signal.listener();

        let waiters: Vec<_> = [first, second]
            .into_iter()
            .map(|mut listener| tokio::spawn(async move { listener.cancelled().await }))
            .collect();

        signal.trigger();
        for waiter in waiters {
            tokio::time::timeout(Duration::from_secs(1), waiter)
                .await
                .expect("listener did not observe shutdown")
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_dropping_signal_releases_listener() {
        let (signal, mut listener) = channel();
        assert!(!listener.is_triggered());
        drop(signal);

        tokio::time::timeout(Duration::from_secs(1), listener.cancelled())
            .await
            .expect("listener did not observe dropped signal");
    }
}
