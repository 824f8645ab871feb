use crate::client_actor::{ClientActor, ClientOutcome};
use crate::config::KitchenConfig;
use crate::error::KitchenError;
use crate::processor::OrderProcessor;
use crate::worker_actor::{WorkerActor, WorkerReport};
use order_buffer::{
    shutdown, BufferSnapshot, ClientId, EventSink, OrderEvent, SharedBuffer, ShutdownSignal,
    WorkerId,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The coordinator: owns the shared buffer and every actor task.
///
/// `Kitchen` is responsible for:
/// - **Wiring**: creating the [`SharedBuffer`] and handing it to each actor
/// - **Lifecycle**: spawning clients, then workers, each in its own Tokio task
/// - **Teardown**: waiting for every client, then stopping the workers
///
/// # Example
///
/// ```rust
/// use order_buffer::TracingSink;
/// use order_kitchen::config::KitchenConfig;
/// use order_kitchen::lifecycle::Kitchen;
/// use order_kitchen::processor::SimulatedProcessor;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), order_kitchen::KitchenError> {
///     let config = KitchenConfig::new(3, 1).with_processing_delay(Duration::from_millis(1));
///     let processor = Arc::new(SimulatedProcessor::new(config.processing_delay));
///
///     let report = Kitchen::run(&config, processor, Arc::new(TracingSink)).await?;
///     assert_eq!(report.completed(), 3);
///     Ok(())
/// }
/// ```
pub struct Kitchen {
    buffer: Arc<SharedBuffer>,
    shutdown: ShutdownSignal,
    clients: Vec<JoinHandle<Result<ClientOutcome, KitchenError>>>,
    workers: Vec<JoinHandle<Result<WorkerReport, KitchenError>>>,
}

/// Everything the kitchen observed, returned once all clients are served.
#[derive(Debug, Clone)]
pub struct KitchenReport {
    /// One outcome per client, in client id order.
    pub clients: Vec<ClientOutcome>,
    pub workers: Vec<WorkerReport>,
    pub snapshot: BufferSnapshot,
}

impl KitchenReport {
    /// Number of orders the clients saw completed.
    pub fn completed(&self) -> usize {
        self.clients.len()
    }

    /// Orders processed across all workers.
    pub fn processed(&self) -> u64 {
        self.workers.iter().map(|worker| worker.processed).sum()
    }
}

impl Kitchen {
    /// Validates `config`, creates the shared buffer and spawns every actor.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// [`KitchenError::InvalidConfig`] or [`KitchenError::Buffer`] if the
    /// shared structures cannot be created. Nothing is spawned in that case.
    pub fn start(
        config: &KitchenConfig,
        processor: Arc<dyn OrderProcessor>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, KitchenError> {
        config.validate()?;
        let buffer = SharedBuffer::new(config.capacity, sink)?;
        let (shutdown, listener) = shutdown::channel();

        // validate() guarantees both populations fit in u32 ids.
        let clients = (1..=config.num_orders as u32)
            .map(|id| {
                let client = ClientActor::new(ClientId(id), buffer.clone(), config.completion_wait);
                tokio::spawn(client.run())
            })
            .collect();

        let workers = (1..=config.num_workers as u32)
            .map(|id| {
                let worker = WorkerActor::new(
                    WorkerId(id),
                    buffer.clone(),
                    processor.clone(),
                    listener.clone(),
                );
                tokio::spawn(worker.run())
            })
            .collect();

        info!(
            num_orders = config.num_orders,
            num_workers = config.num_workers,
            capacity = config.capacity,
            "Kitchen started"
        );

        Ok(Self {
            buffer,
            shutdown,
            clients,
            workers,
        })
    }

    /// Starts a kitchen and waits for it to serve every client.
    ///
    /// # Errors
    ///
    /// See [`start`](Self::start) and [`wait`](Self::wait).
    pub async fn run(
        config: &KitchenConfig,
        processor: Arc<dyn OrderProcessor>,
        sink: Arc<dyn EventSink>,
    ) -> Result<KitchenReport, KitchenError> {
        Self::start(config, processor, sink)?.wait().await
    }

    pub fn snapshot(&self) -> BufferSnapshot {
        self.buffer.snapshot()
    }

    pub fn buffer(&self) -> &Arc<SharedBuffer> {
        &self.buffer
    }

    /// Waits for every client, then stops and joins the workers.
    ///
    /// # Shutdown Process
    ///
    /// 1. Join all client tasks. Once they are done every order is complete.
    /// 2. Trigger the shutdown signal and close the semaphores, waking idle workers.
    /// 3. Join all worker tasks.
    ///
    /// # Errors
    ///
    /// Returns the first client or worker failure, or
    /// [`KitchenError::TaskFailed`] if an actor task panicked. Workers are
    /// still stopped before the error is returned.
    pub async fn wait(self) -> Result<KitchenReport, KitchenError> {
        let mut failure: Option<KitchenError> = None;

        let mut clients = Vec::with_capacity(self.clients.len());
        for handle in self.clients {
            match join(handle).await {
                Ok(outcome) => clients.push(outcome),
                Err(e) => {
                    error!(error = %e, "Client failed");
                    failure.get_or_insert(e);
                }
            }
        }

        info!("All clients served, stopping workers");
        self.shutdown.trigger();
        self.buffer.close();

        let mut workers = Vec::with_capacity(self.workers.len());
        for handle in self.workers {
            match join(handle).await {
                Ok(report) => workers.push(report),
                Err(e) => {
                    error!(error = %e, "Worker failed");
                    failure.get_or_insert(e);
                }
            }
        }

        if let Some(e) = failure {
            return Err(e);
        }

        self.buffer.record(OrderEvent::AllProcessed {
            total: clients.len(),
        });
        Ok(KitchenReport {
            clients,
            workers,
            snapshot: self.buffer.snapshot(),
        })
    }
}

async fn join<T>(handle: JoinHandle<Result<T, KitchenError>>) -> Result<T, KitchenError> {
    handle
        .await
        .map_err(|e| KitchenError::TaskFailed(e.to_string()))?
}
