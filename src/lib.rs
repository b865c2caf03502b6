pub mod commands;
pub mod data;
pub mod engine;
pub mod errors;
pub mod models;
pub mod utils;

use tracing_subscriber::EnvFilter;

/// Initialize tracing from `RUST_LOG`, defaulting to `info`. Logs go to stderr
/// so stdout stays clean for JSON responses.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
