//! Diagnostic logging.
//!
//! Configure via the RUST_LOG environment variable:
//! - `RUST_LOG=debug` - every applied command and undo/redo
//! - `RUST_LOG=locsheet_core::history=debug` - history pushes only
//!
//! Output goes to stderr so that command output on stdout stays clean.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. Defaults to `warn` when RUST_LOG is unset or invalid.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);

    tracing_subscriber::registry().with(stderr_layer).init();
}
