//! The effective configuration and its reload bookkeeping.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};

use crate::config::loader::load_config;
use crate::config::schema::{GlobalConfig, Level};
use crate::observability::metrics;
use crate::sink::FileSystem;

/// Result of a staleness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Checked too recently; the file was not read.
    Fresh,
    /// The file was read and its contents replaced the configuration.
    Replaced,
    /// The file could not be read or parsed; nothing changed.
    Failed,
}

/// Out-of-band request to re-read the config file on the next access.
///
/// Cloned into file watchers; the registry drains it before each staleness
/// check.
#[derive(Debug, Clone, Default)]
pub struct ReloadTrigger(Arc<AtomicBool>);

impl ReloadTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a reload.
    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Consume a pending request, if any.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

/// Holds the current [`GlobalConfig`] and decides when to re-read it.
#[derive(Debug)]
pub struct ConfigStore {
    current: GlobalConfig,
    path: PathBuf,
    interval: Duration,
    last_checked: Option<NaiveDateTime>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>, interval: Duration) -> Self {
        Self {
            current: GlobalConfig::default(),
            path: path.into(),
            interval,
            last_checked: None,
        }
    }

    pub fn config(&self) -> &GlobalConfig {
        &self.current
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Point at a different config file. The next check reads it.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
        self.mark_stale();
    }

    pub fn mark_stale(&mut self) {
        self.last_checked = None;
    }

    /// True when the interval has elapsed since the last check. A clock that
    /// moved backwards also counts as stale.
    pub fn is_stale(&self, now: NaiveDateTime) -> bool {
        match self.last_checked {
            None => true,
            Some(last) => {
                let elapsed = now.signed_duration_since(last);
                elapsed >= self.interval || elapsed < Duration::zero()
            }
        }
    }

    /// Re-read the config file if the last check is older than the interval.
    ///
    /// A successful read replaces the whole configuration; a failed one
    /// leaves it untouched.
    pub fn reload_if_stale(&mut self, fs: &dyn FileSystem, now: NaiveDateTime) -> ReloadOutcome {
        if !self.is_stale(now) {
            return ReloadOutcome::Fresh;
        }
        self.last_checked = Some(now);

        match load_config(fs, &self.path) {
            Ok(config) => {
                if config != self.current {
                    tracing::info!(path = %self.path.display(), "Log configuration changed");
                }
                self.current = config;
                metrics::record_config_reload("replaced");
                ReloadOutcome::Replaced
            }
            Err(e) => {
                tracing::debug!(
                    path = %self.path.display(),
                    error = %e,
                    "Config reload failed, keeping current configuration"
                );
                metrics::record_config_reload("failed");
                ReloadOutcome::Failed
            }
        }
    }

    /// Record an explicit level for `name` in the live configuration.
    ///
    /// The next successful reload replaces the configuration wholesale, so
    /// an override missing from the file does not survive it.
    pub fn set_name_level(&mut self, name: &str, level: Level) {
        self.current.set_name_level(name, level);
    }
}
