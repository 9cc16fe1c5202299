//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registry internals produce:
//!     → tracing events (reload failures, sink errors, recreation)
//!     → metrics.rs counters (handles, reloads, lines written)
//!
//! Consumers:
//!     → whatever tracing subscriber the host installs (logging.rs for the CLI)
//!     → whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Diagnostics never go through the registry itself, so a failing sink
//!   cannot recurse into the logging path
//! - Without a recorder the counters are no-ops

pub mod logging;
pub mod metrics;
