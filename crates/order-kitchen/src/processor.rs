//! # Order Processing
//!
//! What a worker actually does with an order is behind the [`OrderProcessor`]
//! trait. Processing always runs outside the mutation lock, so workers only
//! serialize on bookkeeping, never on work.

use async_trait::async_trait;
use order_buffer::{Order, WorkerId};
use std::time::Duration;
use tracing::debug;

/// The work performed on each claimed order.
///
/// Processing cannot fail and is not interrupted by shutdown: once a worker
/// has claimed an order it always finishes it.
#[async_trait]
pub trait OrderProcessor: Send + Sync + 'static {
    async fn process(&self, worker: WorkerId, order: &Order);
}

/// Stands in for real work with a fixed delay.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedProcessor {
    delay: Duration,
}

impl SimulatedProcessor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl OrderProcessor for SimulatedProcessor {
    async fn process(&self, worker: WorkerId, order: &Order) {
        debug!(%worker, client = %order.client, delay = ?self.delay, "Simulating work");
        tokio::time::sleep(self.delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_buffer::ClientId;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_simulated_processor_takes_its_delay() {
        let processor = SimulatedProcessor::new(Duration::from_secs(3));
        let order = Order::new(ClientId(1), 0);

        let started = Instant::now();
        processor.process(WorkerId(1), &order).await;
        assert!(started.elapsed() >= Duration::from_secs(3));
    }
}
