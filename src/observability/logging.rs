//! Diagnostic output for the command-line tool.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the host. The CLI installs one writing to stderr so it never mixes
//! with log lines sent to stdout.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "named_log=info";

/// Install the fmt subscriber. Safe to call more than once.
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
