//! # Kitchen Lifecycle & Orchestration
//!
//! Individual actors are simple; wiring them together is where the
//! coordination lives. This module provides the [`Kitchen`], which:
//!
//! 1. **Creates the shared structures** - one [`SharedBuffer`](order_buffer::SharedBuffer)
//!    (ring buffer, mutation lock, Admission and Availability), created before any actor.
//! 2. **Spawns a fixed population** - `num_orders` clients first, then `num_workers` workers.
//! 3. **Waits for the clients** - the kitchen is done when every client has its order.
//! 4. **Stops the workers** - workers never stop on their own, so the kitchen broadcasts
//!    a shutdown signal and closes the semaphores before joining them.
//!
//! ```rust,ignore
//! let kitchen = Kitchen::start(&config, processor, sink)?;
//! let report = kitchen.wait().await?;
//! assert_eq!(report.completed(), config.num_orders);
//! ```
//!
//! There is no dynamic scaling: the populations are fixed by [`KitchenConfig`](crate::config::KitchenConfig).

pub mod kitchen;

pub use kitchen::*;
