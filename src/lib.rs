//! Named, leveled logging with per-name configuration.
//!
//! Callers log against a logical name. Each name has its own minimum level,
//! output destinations (file and/or console) and file split policy (none,
//! daily, monthly), all read from a JSON file that is re-checked at most
//! every ten seconds while the process runs.
//!
//! ```no_run
//! use named_log::{log_warning, Level, Registry};
//!
//! let registry = Registry::builder().config_file("log.json").build();
//! registry.set_level("db", Level::Info);
//! log_warning!(registry, "db", "slow query: {}ms", 1200);
//! ```
//!
//! Logging is best-effort: missing or malformed config keeps the previous
//! settings, and a log file that cannot be opened turns that name's calls
//! into no-ops until it can.

pub mod clock;
pub mod config;
pub mod macros;
pub mod observability;
pub mod registry;
pub mod sink;

pub use config::{GlobalConfig, Level, NameConfig, OutputKind, OutputSet, SplitPolicy};
pub use registry::global::{global, set_config_file, set_level};
pub use registry::{LoggerHandle, Registry, RegistryBuilder};
