//! Configuration validation.
//!
//! # Responsibilities
//! - Turn a loosely typed [`ConfigFile`] into a [`GlobalConfig`]
//! - Replace out-of-range globals with the built-in defaults
//! - Resolve per-name gaps against the defaults computed in the same pass
//!
//! # Design Decisions
//! - Never rejects: every invalid value has a well-defined fallback
//! - Pure function, no I/O

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::schema::{ConfigFile, GlobalConfig, Level, NameConfig, OutputSet, SplitPolicy};
use crate::config::DEFAULT_LOG_DIR;

/// Build the effective configuration from a parsed config file.
pub fn normalize(raw: ConfigFile) -> GlobalConfig {
    let outputs = raw
        .out
        .as_deref()
        .map(OutputSet::parse)
        .unwrap_or_default();

    let default_level = raw.level.and_then(Level::from_code).unwrap_or(Level::Debug);
    let default_split = raw
        .file_split
        .and_then(SplitPolicy::from_code)
        .unwrap_or(SplitPolicy::None);

    let log_dir = match raw.file_dir.or(raw.log_dir) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(DEFAULT_LOG_DIR),
    };

    let mut per_name = BTreeMap::new();
    for entry in raw.log_levels.unwrap_or_default().into_iter().flatten() {
        let Some(name) = entry.log_name.filter(|n| !n.is_empty()) else {
            continue;
        };
        let file_base_name = entry
            .file_name
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| name.clone());

        // Later duplicates win.
        per_name.insert(
            name.clone(),
            NameConfig {
                level: entry.level.and_then(Level::from_code).unwrap_or(default_level),
                split: entry
                    .file_split
                    .and_then(SplitPolicy::from_code)
                    .unwrap_or(default_split),
                name,
                file_base_name,
            },
        );
    }

    GlobalConfig {
        outputs,
        default_level,
        default_split,
        log_dir,
        per_name,
    }
}
