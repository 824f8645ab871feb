//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing_subscriber` formatter for the
//! whole process. Verbosity is controlled with `RUST_LOG`; when it is unset
//! the filter defaults to `info`, which shows every order event.
//!
//! ```bash
//! RUST_LOG=info cargo run -p order-kitchen     # order events
//! RUST_LOG=debug cargo run -p order-kitchen    # plus semaphore and cursor detail
//! RUST_LOG=warn cargo run -p order-kitchen     # only anomalies
//! ```
//!
//! With `RUST_LOG=info` a run of the default kitchen looks like:
//!
//! ```text
//! INFO client{client=client_3}: Order placed client=client_3 position=0 slot=0
//! INFO client{client=client_1}: Order placed client=client_1 position=1 slot=1
//! INFO worker{worker=worker_1}: Preparing order client=client_3 position=0
//! INFO worker{worker=worker_2}: Preparing order client=client_1 position=1
//! INFO worker{worker=worker_1}: Order finished client=client_3 position=0
//! INFO client{client=client_3}: Order received client=client_3 position=0 worker=worker_1
//! ...
//! INFO All orders processed total=5
//! ```

use tracing_subscriber::EnvFilter;

pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // Actor spans already say who is talking
        .compact()
        .init();
}
