//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! log.json
//!     → loader.rs (read & deserialize)
//!     → validation.rs (fallbacks for invalid fields)
//!     → GlobalConfig (validated)
//!     → store.rs (wholesale replace, reload bookkeeping)
//!
//! Every registry access:
//!     store.rs checks the last-checked timestamp
//!     → re-reads when the interval has elapsed
//!     → on failure keeps the previous GlobalConfig
//!
//! Optional:
//!     watcher.rs detects a file change → flags the store stale
//! ```
//!
//! # Design Decisions
//! - Config is replaced whole, never merged
//! - All fields have fallbacks so a partial file is still usable
//! - Load failures are swallowed; the old config stays authoritative

use std::time::Duration;

pub mod loader;
pub mod schema;
pub mod store;
pub mod validation;
pub mod watcher;

pub use schema::{GlobalConfig, Level, NameConfig, OutputKind, OutputSet, SplitPolicy};
pub use store::{ConfigStore, ReloadOutcome, ReloadTrigger};

/// Config file consulted when none is set.
pub const DEFAULT_CONFIG_FILE: &str = "log.json";

/// Directory for log files when the config names none.
pub const DEFAULT_LOG_DIR: &str = "./log/";

/// Minimum time between two reads of the config file.
pub const DEFAULT_RELOAD_INTERVAL: Duration = Duration::from_secs(10);
