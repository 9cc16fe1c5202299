//! Configuration schema definitions.
//!
//! Two shapes live here: [`ConfigFile`] mirrors the JSON document on disk
//! (loose, every field optional), and [`GlobalConfig`] is the validated form
//! the registry works against. `validation.rs` converts one into the other.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_LOG_DIR;

/// Severity of a log line. Ordered from least to most severe.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Level {
    Debug = 1,
    Info = 2,
    Warning = 3,
    Error = 4,
}

impl Level {
    /// All levels, least severe first.
    pub const ALL: [Level; 4] = [Level::Debug, Level::Info, Level::Warning, Level::Error];

    /// Map a config-file code (1..=4) to a level.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Level::Debug),
            2 => Some(Level::Info),
            3 => Some(Level::Warning),
            4 => Some(Level::Error),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Upper-case label written into every line.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" | "1" => Ok(Level::Debug),
            "info" | "2" => Ok(Level::Info),
            "warn" | "warning" | "3" => Ok(Level::Warning),
            "error" | "4" => Ok(Level::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// How the log file name encodes the calendar date.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum SplitPolicy {
    /// One file forever: `{name}.log`.
    None = 1,
    /// One file per day: `{name}_{y}-{m}-{d}.log`.
    Day = 2,
    /// One file per month: `{name}_{y}-{m}.log`.
    Month = 3,
}

impl SplitPolicy {
    /// Map a config-file code (1..=3) to a split policy.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(SplitPolicy::None),
            2 => Some(SplitPolicy::Day),
            3 => Some(SplitPolicy::Month),
            _ => None,
        }
    }
}

/// A kind of output destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum OutputKind {
    Console,
    File,
}

/// The set of enabled output kinds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputSet(BTreeSet<OutputKind>);

impl OutputSet {
    pub fn file_only() -> Self {
        Self(BTreeSet::from([OutputKind::File]))
    }

    pub fn of(kinds: &[OutputKind]) -> Self {
        Self(kinds.iter().copied().collect())
    }

    /// Parse the `Out` token string (`"FILE"`, `"CONSOLE"`, `"file|console"`...).
    ///
    /// Matching is case-insensitive and substring based. Anything that names
    /// neither kind falls back to file-only.
    pub fn parse(out: &str) -> Self {
        let out = out.to_ascii_uppercase();
        let mut kinds = BTreeSet::new();
        if out.contains("FILE") {
            kinds.insert(OutputKind::File);
        }
        if out.contains("CONSOLE") {
            kinds.insert(OutputKind::Console);
        }
        if kinds.is_empty() {
            return Self::file_only();
        }
        Self(kinds)
    }

    pub fn contains(&self, kind: OutputKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = OutputKind> + '_ {
        self.0.iter().copied()
    }
}

impl Default for OutputSet {
    fn default() -> Self {
        Self::file_only()
    }
}

/// The config file as written on disk.
///
/// Every field is optional; invalid values are resolved during validation,
/// not rejected. A field of the wrong JSON type fails the whole parse.
/// Keys are matched case-insensitively by the loader before this struct
/// sees them (see [`ConfigFile::KEYS`]).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ConfigFile {
    /// Output tokens, e.g. `"FILE|CONSOLE"`.
    pub out: Option<String>,

    /// Default level code (1..=4).
    pub level: Option<i64>,

    /// Default split code (1..=3).
    pub file_split: Option<i64>,

    /// Directory for log files.
    pub file_dir: Option<String>,

    /// Older spelling of `FileDir`; only used when `FileDir` is absent.
    pub log_dir: Option<String>,

    /// Per-name overrides. `null` entries are skipped.
    pub log_levels: Option<Vec<Option<ConfigFileEntry>>>,
}

impl ConfigFile {
    /// Canonical spelling of every top-level key.
    pub const KEYS: [&'static str; 6] = ["Out", "Level", "FileSplit", "FileDir", "LogDir", "LogLevels"];
}

/// One entry of `LogLevels`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ConfigFileEntry {
    pub log_name: Option<String>,
    pub level: Option<i64>,
    pub file_split: Option<i64>,
    pub file_name: Option<String>,
}

impl ConfigFileEntry {
    /// Canonical spelling of every entry key.
    pub const KEYS: [&'static str; 4] = ["LogName", "Level", "FileSplit", "FileName"];
}

/// Settings for one logical log name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NameConfig {
    pub name: String,
    pub level: Level,
    pub split: SplitPolicy,
    /// File name stem; the name itself unless configured otherwise.
    pub file_base_name: String,
}

/// The effective, validated configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GlobalConfig {
    pub outputs: OutputSet,
    pub default_level: Level,
    pub default_split: SplitPolicy,
    pub log_dir: PathBuf,
    pub per_name: BTreeMap<String, NameConfig>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            outputs: OutputSet::file_only(),
            default_level: Level::Debug,
            default_split: SplitPolicy::None,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            per_name: BTreeMap::new(),
        }
    }
}

impl GlobalConfig {
    /// Effective settings for `name`: its override if present, otherwise the
    /// global defaults.
    pub fn settings_for(&self, name: &str) -> NameConfig {
        match self.per_name.get(name) {
            Some(entry) => entry.clone(),
            None => NameConfig {
                name: name.to_string(),
                level: self.default_level,
                split: self.default_split,
                file_base_name: name.to_string(),
            },
        }
    }

    /// Record a level for `name`, creating an entry from the current
    /// defaults when none exists.
    pub fn set_name_level(&mut self, name: &str, level: Level) {
        let default_split = self.default_split;
        self.per_name
            .entry(name.to_string())
            .and_modify(|entry| entry.level = level)
            .or_insert_with(|| NameConfig {
                name: name.to_string(),
                level,
                split: default_split,
                file_base_name: name.to_string(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_codes_round_trip() {
        for level in Level::ALL {
            assert_eq!(Level::from_code(i64::from(level.code())), Some(level));
        }
        assert_eq!(Level::from_code(0), None);
        assert_eq!(Level::from_code(5), None);
        assert!(Level::Debug < Level::Error);
    }

    #[test]
    fn level_from_str() {
        assert_eq!("WARN".parse::<Level>(), Ok(Level::Warning));
        assert_eq!("error".parse::<Level>(), Ok(Level::Error));
        assert!("loud".parse::<Level>().is_err());
    }

    #[test]
    fn output_tokens() {
        assert_eq!(OutputSet::parse(""), OutputSet::file_only());
        assert_eq!(OutputSet::parse("bogus"), OutputSet::file_only());
        assert_eq!(OutputSet::parse("console"), OutputSet::of(&[OutputKind::Console]));

        let both = OutputSet::parse("File|Console");
        assert!(both.contains(OutputKind::File));
        assert!(both.contains(OutputKind::Console));
    }

    #[test]
    fn settings_fall_back_to_defaults() {
        let config = GlobalConfig::default();
        let settings = config.settings_for("svc");
        assert_eq!(settings.level, Level::Debug);
        assert_eq!(settings.split, SplitPolicy::None);
        assert_eq!(settings.file_base_name, "svc");
    }

    #[test]
    fn set_name_level_keeps_existing_entry_fields() {
        let mut config = GlobalConfig::default();
        config.per_name.insert(
            "svc".into(),
            NameConfig {
                name: "svc".into(),
                level: Level::Info,
                split: SplitPolicy::Month,
                file_base_name: "service".into(),
            },
        );

        config.set_name_level("svc", Level::Error);
        config.set_name_level("fresh", Level::Warning);

        let svc = &config.per_name["svc"];
        assert_eq!(svc.level, Level::Error);
        assert_eq!(svc.split, SplitPolicy::Month);
        assert_eq!(svc.file_base_name, "service");

        let fresh = &config.per_name["fresh"];
        assert_eq!(fresh.split, config.default_split);
        assert_eq!(fresh.file_base_name, "fresh");
    }
}
