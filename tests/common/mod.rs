//! Shared fixtures for registry integration tests.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use named_log::clock::ManualClock;
use named_log::sink::{MemoryConsole, MemoryFileSystem};
use named_log::Registry;

/// A registry wired to in-memory backends and a hand-driven clock.
pub struct Harness {
    pub registry: Registry,
    pub fs: Arc<MemoryFileSystem>,
    pub console: Arc<MemoryConsole>,
    pub clock: Arc<ManualClock>,
}

pub fn at(year: i32, month: u32, day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(h, m, s))
        .unwrap()
}

/// Build a harness whose `log.json` holds `config` (when given).
pub fn harness(config: Option<&str>) -> Harness {
    let fs = Arc::new(MemoryFileSystem::new());
    if let Some(config) = config {
        fs.write_file("log.json", config);
    }
    let console = Arc::new(MemoryConsole::new());
    let clock = Arc::new(ManualClock::new(at(2024, 3, 5, 12, 0, 0)));

    let registry = Registry::builder()
        .config_file("log.json")
        .file_system(fs.clone())
        .console(console.clone())
        .clock(clock.clone())
        .build();

    Harness {
        registry,
        fs,
        console,
        clock,
    }
}
