//! Logging and tracing initialization.
//!
//! Diagnostics go to stderr through `tracing`; stdout is left to the progress
//! lines and summaries printed by the CLI.

use tracing_subscriber::{EnvFilter, fmt};

/// Filter level for a `-v` count: 0 → warn, 1 → info, 2+ → debug.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `verbosity` when set.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbosity: u8) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(verbosity >= 2)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}
