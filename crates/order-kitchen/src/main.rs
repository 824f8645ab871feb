//! # Order Kitchen
//!
//! Runs the default kitchen: five clients, two workers, five slots, three
//! seconds of work per order. Takes no arguments; `RUST_LOG` sets verbosity.

use order_buffer::tracing::setup_tracing;
use order_buffer::TracingSink;
use order_kitchen::config::KitchenConfig;
use order_kitchen::lifecycle::Kitchen;
use order_kitchen::processor::SimulatedProcessor;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = KitchenConfig::default();
    info!(
        num_orders = config.num_orders,
        num_workers = config.num_workers,
        "Starting kitchen"
    );

    let processor = Arc::new(SimulatedProcessor::new(config.processing_delay));
    let report = Kitchen::run(&config, processor, Arc::new(TracingSink))
        .await
        .map_err(|e| {
            error!(error = %e, "Kitchen failed");
            e.to_string()
        })?;

    info!(
        completed = report.completed(),
        processed = report.processed(),
        "Application completed successfully"
    );
    Ok(())
}
