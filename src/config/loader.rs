//! Configuration loading from disk.

use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::schema::{ConfigFile, ConfigFileEntry, GlobalConfig};
use crate::config::validation::normalize;
use crate::sink::FileSystem;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read, parse and validate the JSON config file at `path`.
pub fn load_config(fs: &dyn FileSystem, path: &Path) -> Result<GlobalConfig, ConfigError> {
    let content = fs.read_to_string(path)?;
    let document: Value = serde_json::from_str(&content)?;
    let raw: ConfigFile = serde_json::from_value(canonical_document(document))?;

    Ok(normalize(raw))
}

/// Rewrite keys to their canonical spelling, matching ASCII case-insensitively.
fn canonical_document(value: Value) -> Value {
    let mut document = canonical_keys(value, &ConfigFile::KEYS);
    if let Some(Value::Array(entries)) = document.get_mut("LogLevels") {
        for entry in entries.iter_mut() {
            *entry = canonical_keys(entry.take(), &ConfigFileEntry::KEYS);
        }
    }
    document
}

/// Keys that match none of `known` are kept as-is and ignored later. When a
/// key appears in several spellings, the exact canonical spelling wins.
fn canonical_keys(value: Value, known: &[&str]) -> Value {
    let Value::Object(object) = value else {
        return value;
    };

    let mut canonical = Map::with_capacity(object.len());
    let mut folded = Map::new();
    for (key, value) in object {
        match known.iter().find(|k| k.eq_ignore_ascii_case(&key)) {
            Some(k) if *k == key => {
                canonical.insert(key, value);
            }
            Some(k) => {
                folded.insert((*k).to_string(), value);
            }
            None => {
                canonical.insert(key, value);
            }
        }
    }
    for (key, value) in folded {
        canonical.entry(key).or_insert(value);
    }
    Value::Object(canonical)
}
