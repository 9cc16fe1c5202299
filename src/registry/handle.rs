//! Per-name logger state.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};

use chrono::{Datelike, NaiveDate};

use crate::config::schema::{GlobalConfig, Level, NameConfig, OutputKind, SplitPolicy};
use crate::sink::{FileSink, FileSystem, SinkError};

/// Log file location for a base name, split policy and calendar date.
///
/// Month and day are not zero-padded: `svc_2024-3-5.log`.
pub fn log_file_path(dir: &Path, base: &str, split: SplitPolicy, date: NaiveDate) -> PathBuf {
    let file = match split {
        SplitPolicy::None => format!("{base}.log"),
        SplitPolicy::Day => format!("{base}_{}-{}-{}.log", date.year(), date.month(), date.day()),
        SplitPolicy::Month => format!("{base}_{}-{}.log", date.year(), date.month()),
    };
    dir.join(file)
}

/// The sinks a handle for some name should have right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExpectedSinks {
    pub file_path: Option<PathBuf>,
    pub console: bool,
}

impl ExpectedSinks {
    pub fn compute(config: &GlobalConfig, settings: &NameConfig, date: NaiveDate) -> Self {
        let file_path = config.outputs.contains(OutputKind::File).then(|| {
            log_file_path(&config.log_dir, &settings.file_base_name, settings.split, date)
        });
        Self {
            file_path,
            console: config.outputs.contains(OutputKind::Console),
        }
    }
}

/// Resolved state for one logical log name.
///
/// Only the level is mutable; anything else that changes produces a new
/// handle.
#[derive(Debug)]
pub struct LoggerHandle {
    name: String,
    level: AtomicU8,
    split: SplitPolicy,
    file_base_name: String,
    file: Option<FileSink>,
    console: bool,
}

impl LoggerHandle {
    /// Build a handle, opening its file sink when one is expected.
    pub(crate) fn open(
        settings: &NameConfig,
        sinks: ExpectedSinks,
        fs: &dyn FileSystem,
    ) -> Result<Self, SinkError> {
        let file = match sinks.file_path {
            Some(path) => Some(FileSink::open(fs, &path)?),
            None => None,
        };

        Ok(Self {
            name: settings.name.clone(),
            level: AtomicU8::new(settings.level.code()),
            split: settings.split,
            file_base_name: settings.file_base_name.clone(),
            file,
            console: sinks.console,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Level {
        Level::from_code(i64::from(self.level.load(Ordering::Relaxed))).unwrap_or(Level::Debug)
    }

    pub fn set_level(&self, level: Level) {
        self.level.store(level.code(), Ordering::Relaxed);
    }

    /// Whether a line at `level` passes this handle's threshold.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    pub fn split(&self) -> SplitPolicy {
        self.split
    }

    pub fn file_base_name(&self) -> &str {
        &self.file_base_name
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file.as_ref().map(FileSink::path)
    }

    pub fn has_console(&self) -> bool {
        self.console
    }

    pub(crate) fn file(&self) -> Option<&FileSink> {
        self.file.as_ref()
    }

    /// Why this handle no longer matches `expected`, if it doesn't.
    pub(crate) fn divergence(&self, expected: &ExpectedSinks) -> Option<&'static str> {
        if self.file_path() != expected.file_path.as_deref() {
            Some("file_path")
        } else if self.console != expected.console {
            Some("outputs")
        } else {
            None
        }
    }

    /// Release the file sink. Later writes through this handle are dropped.
    pub(crate) fn close(&self) {
        if let Some(file) = &self.file {
            file.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::OutputSet;
    use crate::sink::memory::MemoryFileSystem;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn settings(level: Level) -> NameConfig {
        NameConfig {
            name: "svc".into(),
            level,
            split: SplitPolicy::Day,
            file_base_name: "service".into(),
        }
    }

    #[test]
    fn file_paths_per_split_policy() {
        let dir = Path::new("/tmp/l");
        assert_eq!(
            log_file_path(dir, "svc", SplitPolicy::None, date()),
            PathBuf::from("/tmp/l/svc.log")
        );
        assert_eq!(
            log_file_path(dir, "svc", SplitPolicy::Day, date()),
            PathBuf::from("/tmp/l/svc_2024-3-5.log")
        );
        assert_eq!(
            log_file_path(dir, "svc", SplitPolicy::Month, date()),
            PathBuf::from("/tmp/l/svc_2024-3.log")
        );
    }

    #[test]
    fn expected_sinks_follow_outputs() {
        let mut config = GlobalConfig::default();
        config.outputs = OutputSet::of(&[OutputKind::Console]);
        let sinks = ExpectedSinks::compute(&config, &settings(Level::Info), date());
        assert_eq!(sinks.file_path, None);
        assert!(sinks.console);
    }

    #[test]
    fn level_threshold() {
        let fs = MemoryFileSystem::new();
        let sinks = ExpectedSinks {
            file_path: None,
            console: true,
        };
        let handle = LoggerHandle::open(&settings(Level::Warning), sinks, &fs).unwrap();

        assert!(!handle.enabled(Level::Info));
        assert!(handle.enabled(Level::Warning));
        assert!(handle.enabled(Level::Error));

        handle.set_level(Level::Debug);
        assert!(handle.enabled(Level::Debug));
    }

    #[test]
    fn divergence_detects_path_and_console_changes() {
        let fs = MemoryFileSystem::new();
        let expected = ExpectedSinks {
            file_path: Some("/tmp/l/service_2024-3-5.log".into()),
            console: false,
        };
        let handle = LoggerHandle::open(&settings(Level::Info), expected.clone(), &fs).unwrap();
        assert_eq!(handle.divergence(&expected), None);

        let next_day = ExpectedSinks {
            file_path: Some("/tmp/l/service_2024-3-6.log".into()),
            console: false,
        };
        assert_eq!(handle.divergence(&next_day), Some("file_path"));

        let with_console = ExpectedSinks {
            console: true,
            ..expected
        };
        assert_eq!(handle.divergence(&with_console), Some("outputs"));
    }
}
