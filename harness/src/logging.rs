//! Development-time tracing for the harness and corpus binaries.
//!
//! Diagnostics go to stderr, filtered by `RUST_LOG`. Lines a program prints
//! are captured per run and never pass through the subscriber, so turning
//! logging up cannot change what a run reports.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "warn";

/// Install the stderr subscriber.
///
/// ```bash
/// RUST_LOG=harness=debug cargo run -p harness -- run script.lisp
/// RUST_LOG=corpus=debug,harness=trace cargo run -p corpus -- run --filter bus
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A second call (or a subscriber installed by an embedding program) keeps
    // the existing one.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
