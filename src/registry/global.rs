//! Process-wide registry for callers that do not thread one through.

use std::path::PathBuf;
use std::sync::OnceLock;

use crate::config::schema::Level;
use crate::registry::Registry;

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// The shared registry, created on first use with the default settings
/// (`log.json`, real file system, stdout).
pub fn global() -> &'static Registry {
    GLOBAL.get_or_init(Registry::new)
}

/// Point the shared registry at another config file.
pub fn set_config_file(path: impl Into<PathBuf>) {
    global().set_config_file(path);
}

/// Override the level of `name` on the shared registry.
pub fn set_level(name: &str, level: Level) {
    global().set_level(name, level);
}
