//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info,storekeep_restock=debug,storekeep_sales=debug";

/// Initialize tracing for the process.
///
/// `STOREKEEP_LOG` takes precedence over `RUST_LOG`; with neither set, info
/// everywhere and debug for the transactor crates. Safe to call more than
/// once (later calls are no-ops).
pub fn init() {
    let filter = std::env::var("STOREKEEP_LOG")
        .map(EnvFilter::new)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
