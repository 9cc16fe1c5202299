//! Logger registry: name → handle resolution.
//!
//! # Data Flow
//! ```text
//! log call (name, level, message)
//!     → resolve(name)
//!         → ConfigStore::reload_if_stale (at most once per interval)
//!         → existing handle still matches config + date?  → reuse
//!         → otherwise close old file, open new one        → replace
//!     → level filter (no formatting below threshold)
//!     → emit.rs writes to file and/or console
//! ```
//!
//! # Design Decisions
//! - One lock guards the config and the handle map together, so a handle is
//!   never built against a half-replaced config
//! - File open/close happens under that lock; creation is serialized
//! - Emission runs outside the lock against an `Arc<LoggerHandle>` snapshot
//! - Failures degrade to "no handle"; nothing is returned to callers

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use parking_lot::Mutex;

use crate::clock::{Clock, SystemClock};
use crate::config::schema::{GlobalConfig, Level};
use crate::config::store::{ConfigStore, ReloadOutcome, ReloadTrigger};
use crate::config::watcher::ConfigWatcher;
use crate::config::{DEFAULT_CONFIG_FILE, DEFAULT_RELOAD_INTERVAL};
use crate::observability::metrics;
use crate::sink::{Console, FileSystem, OsFileSystem, StdoutConsole};

pub mod emit;
pub mod global;
pub mod handle;

pub use handle::{log_file_path, LoggerHandle};

use handle::ExpectedSinks;

/// Everything behind the registry lock.
struct RegistryState {
    store: ConfigStore,
    handles: HashMap<String, Arc<LoggerHandle>>,
}

impl RegistryState {
    /// Push levels from a freshly loaded config into live handles.
    fn sync_levels(&self) {
        let config = self.store.config();
        for (name, handle) in &self.handles {
            handle.set_level(config.settings_for(name).level);
        }
    }

    fn resolve(
        &mut self,
        name: &str,
        now: NaiveDateTime,
        fs: &dyn FileSystem,
    ) -> Option<Arc<LoggerHandle>> {
        let config = self.store.config();
        let settings = config.settings_for(name);
        let expected = ExpectedSinks::compute(config, &settings, now.date());

        if let Some(existing) = self.handles.get(name) {
            let Some(reason) = existing.divergence(&expected) else {
                return Some(Arc::clone(existing));
            };
            tracing::debug!(
                log_name = name,
                reason,
                old = ?existing.file_path(),
                new = ?expected.file_path,
                "Recreating log handle"
            );
            existing.close();
            metrics::record_handle_recreated(reason);
            self.handles.remove(name);
        }

        match LoggerHandle::open(&settings, expected, fs) {
            Ok(handle) => {
                let handle = Arc::new(handle);
                self.handles.insert(name.to_string(), Arc::clone(&handle));
                metrics::record_handle_created();
                Some(handle)
            }
            Err(e) => {
                tracing::warn!(log_name = name, error = %e, "Log handle unavailable");
                metrics::record_sink_open_failure();
                None
            }
        }
    }
}

/// Maps logical log names to their handles.
///
/// Construct one per process (or use [`global`](global::global)) and share
/// it by reference.
pub struct Registry {
    state: Mutex<RegistryState>,
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
    console: Arc<dyn Console>,
    reload: ReloadTrigger,
}

impl Registry {
    /// A registry on the real file system, local clock and stdout, reading
    /// `log.json` from the working directory.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Handle for `name`, creating or recreating it as the current config
    /// and date require. `None` when its file could not be opened.
    pub fn resolve(&self, name: &str) -> Option<Arc<LoggerHandle>> {
        self.resolve_at(name, self.clock.now())
    }

    /// [`resolve`](Self::resolve) as of `now`.
    pub(crate) fn resolve_at(&self, name: &str, now: NaiveDateTime) -> Option<Arc<LoggerHandle>> {
        let mut state = self.state.lock();
        self.refresh(&mut state, now);
        state.resolve(name, now, self.fs.as_ref())
    }

    /// Set the level for `name` in its live handle and in the config.
    ///
    /// A later successful reload replaces the config wholesale; unless the
    /// file carries the same level, the override is lost at that point.
    pub fn set_level(&self, name: &str, level: Level) {
        let now = self.clock.now();
        let mut state = self.state.lock();
        self.refresh(&mut state, now);
        if let Some(handle) = state.resolve(name, now, self.fs.as_ref()) {
            handle.set_level(level);
        }
        state.store.set_name_level(name, level);
    }

    /// [`set_level`](Self::set_level) from a numeric code; codes outside
    /// 1..=4 are ignored.
    pub fn set_level_code(&self, name: &str, code: i64) {
        match Level::from_code(code) {
            Some(level) => self.set_level(name, level),
            None => tracing::debug!(log_name = name, code, "Ignoring out-of-range log level"),
        }
    }

    /// Switch to another config file; it is read on the next access.
    pub fn set_config_file(&self, path: impl Into<PathBuf>) {
        self.state.lock().store.set_path(path);
    }

    pub fn config_file(&self) -> PathBuf {
        self.state.lock().store.path().to_path_buf()
    }

    /// The effective configuration, after a staleness check.
    pub fn config(&self) -> GlobalConfig {
        let now = self.clock.now();
        let mut state = self.state.lock();
        self.refresh(&mut state, now);
        state.store.config().clone()
    }

    /// A trigger that makes the next access re-read the config file.
    pub fn reload_trigger(&self) -> ReloadTrigger {
        self.reload.clone()
    }

    /// Watch the current config file and reload as soon as it changes.
    /// Dropping the returned watcher stops watching.
    pub fn watch_config(&self) -> Result<notify::RecommendedWatcher, notify::Error> {
        ConfigWatcher::new(&self.config_file(), self.reload_trigger()).run()
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub(crate) fn console(&self) -> &dyn Console {
        self.console.as_ref()
    }

    fn refresh(&self, state: &mut RegistryState, now: NaiveDateTime) {
        if self.reload.take() {
            state.store.mark_stale();
        }
        if state.store.reload_if_stale(self.fs.as_ref(), now) == ReloadOutcome::Replaced {
            state.sync_levels();
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Registry`].
pub struct RegistryBuilder {
    config_file: PathBuf,
    reload_interval: Duration,
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
    console: Arc<dyn Console>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            reload_interval: DEFAULT_RELOAD_INTERVAL,
            fs: Arc::new(OsFileSystem),
            clock: Arc::new(SystemClock),
            console: Arc::new(StdoutConsole),
        }
    }
}

impl RegistryBuilder {
    pub fn config_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_file = path.as_ref().to_path_buf();
        self
    }

    pub fn reload_interval(mut self, interval: Duration) -> Self {
        self.reload_interval = interval;
        self
    }

    pub fn file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = console;
        self
    }

    pub fn build(self) -> Registry {
        let interval = chrono::Duration::from_std(self.reload_interval)
            .unwrap_or_else(|_| chrono::Duration::seconds(10));

        Registry {
            state: Mutex::new(RegistryState {
                store: ConfigStore::new(self.config_file, interval),
                handles: HashMap::new(),
            }),
            fs: self.fs,
            clock: self.clock,
            console: self.console,
            reload: ReloadTrigger::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::sink::memory::MemoryFileSystem;
    use chrono::NaiveDate;

    fn registry(fs: &Arc<MemoryFileSystem>) -> Registry {
        let start = NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        Registry::builder()
            .file_system(fs.clone())
            .clock(Arc::new(ManualClock::new(start)))
            .console(Arc::new(crate::sink::MemoryConsole::new()))
            .build()
    }

    #[test]
    fn missing_config_uses_builtin_defaults() {
        let fs = Arc::new(MemoryFileSystem::new());
        let registry = registry(&fs);

        let handle = registry.resolve("svc").unwrap();
        assert_eq!(handle.level(), Level::Debug);
        assert_eq!(handle.file_path(), Some(Path::new("./log/svc.log")));
        assert!(!handle.has_console());
        assert!(fs.dir_exists("./log"));
    }

    #[test]
    fn resolve_reuses_matching_handle() {
        let fs = Arc::new(MemoryFileSystem::new());
        let registry = registry(&fs);

        let first = registry.resolve("svc").unwrap();
        let second = registry.resolve("svc").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(fs.open_count("./log/svc.log"), 1);
    }

    #[test]
    fn out_of_range_level_code_is_ignored() {
        let fs = Arc::new(MemoryFileSystem::new());
        let registry = registry(&fs);
        registry.set_level_code("svc", 7);

        assert!(registry.config().per_name.is_empty());
        assert!(fs.events().is_empty());
    }

    #[test]
    fn set_level_code_in_range_applies() {
        let fs = Arc::new(MemoryFileSystem::new());
        let registry = registry(&fs);
        registry.set_level_code("svc", 3);

        assert_eq!(registry.resolve("svc").unwrap().level(), Level::Warning);
        assert_eq!(registry.config().per_name["svc"].level, Level::Warning);
    }

    #[test]
    fn set_config_file_is_read_on_next_access() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.write_file("other.json", r#"{"Level":4}"#);
        let registry = registry(&fs);
        assert_eq!(registry.config().default_level, Level::Debug);

        registry.set_config_file("other.json");
        assert_eq!(registry.config_file(), PathBuf::from("other.json"));
        assert_eq!(registry.config().default_level, Level::Error);
    }
}
