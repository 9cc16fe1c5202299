//! Configuration file watcher for change-driven reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::store::ReloadTrigger;

/// A watcher that monitors the configuration file for changes.
///
/// It does not read the file itself; it only flags the registry so the next
/// log call re-reads it instead of waiting out the reload interval.
pub struct ConfigWatcher {
    path: PathBuf,
    trigger: ReloadTrigger,
}

impl ConfigWatcher {
    pub fn new(path: &Path, trigger: ReloadTrigger) -> Self {
        Self {
            path: path.to_path_buf(),
            trigger,
        }
    }

    /// Start watching. Dropping the returned watcher stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let trigger = self.trigger.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::debug!("Log config file change detected");
                        trigger.request();
                    }
                }
                Err(e) => tracing::warn!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Log config watcher started");
        Ok(watcher)
    }
}
