//! # Order Kitchen
//!
//! Client and worker actors around the [`order_buffer`] synchronization core.
//!
//! Clients (producers) each place one order into a bounded ring buffer and
//! wait for it to be completed. Workers (consumers) repeatedly withdraw the
//! oldest pending order, process it outside the lock, and mark it done.
//!
//! ## Module Tour
//!
//! - **[`client_actor`]**: [`ClientActor`](client_actor::ClientActor), the one-shot producer.
//! - **[`worker_actor`]**: [`WorkerActor`](worker_actor::WorkerActor), the long-running consumer.
//! - **[`processor`]**: the [`OrderProcessor`](processor::OrderProcessor) seam for the work itself.
//! - **[`config`]**: [`KitchenConfig`](config::KitchenConfig), population sizes and timings.
//! - **[`lifecycle`]**: [`Kitchen`](lifecycle::Kitchen), the coordinator.
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info cargo run -p order-kitchen
//! ```

pub mod client_actor;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod processor;
pub mod worker_actor;

pub use error::KitchenError;
