//! Leveled emit operations.
//!
//! Each severity has a format variant taking [`fmt::Arguments`] and a join
//! variant taking displayable parts. Both resolve the handle and check the
//! level before anything is formatted.

use std::fmt;
use std::panic::Location;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::config::schema::Level;
use crate::observability::metrics;
use crate::registry::{LoggerHandle, Registry};

/// Displays parts separated by single spaces.
struct Join<'a>(&'a [&'a dyn fmt::Display]);

impl fmt::Display for Join<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

impl Registry {
    /// Log a formatted message for `name` at `level`.
    #[track_caller]
    pub fn log(&self, level: Level, name: &str, args: fmt::Arguments<'_>) {
        self.emit(level, name, &args, Location::caller());
    }

    /// Log `parts` joined by spaces for `name` at `level`.
    #[track_caller]
    pub fn log_join(&self, level: Level, name: &str, parts: &[&dyn fmt::Display]) {
        self.emit(level, name, &Join(parts), Location::caller());
    }

    #[track_caller]
    pub fn debug(&self, name: &str, args: fmt::Arguments<'_>) {
        self.emit(Level::Debug, name, &args, Location::caller());
    }

    #[track_caller]
    pub fn info(&self, name: &str, args: fmt::Arguments<'_>) {
        self.emit(Level::Info, name, &args, Location::caller());
    }

    #[track_caller]
    pub fn warning(&self, name: &str, args: fmt::Arguments<'_>) {
        self.emit(Level::Warning, name, &args, Location::caller());
    }

    #[track_caller]
    pub fn error(&self, name: &str, args: fmt::Arguments<'_>) {
        self.emit(Level::Error, name, &args, Location::caller());
    }

    #[track_caller]
    pub fn debug_join(&self, name: &str, parts: &[&dyn fmt::Display]) {
        self.emit(Level::Debug, name, &Join(parts), Location::caller());
    }

    #[track_caller]
    pub fn info_join(&self, name: &str, parts: &[&dyn fmt::Display]) {
        self.emit(Level::Info, name, &Join(parts), Location::caller());
    }

    #[track_caller]
    pub fn warning_join(&self, name: &str, parts: &[&dyn fmt::Display]) {
        self.emit(Level::Warning, name, &Join(parts), Location::caller());
    }

    #[track_caller]
    pub fn error_join(&self, name: &str, parts: &[&dyn fmt::Display]) {
        self.emit(Level::Error, name, &Join(parts), Location::caller());
    }

    fn emit(&self, level: Level, name: &str, message: &dyn fmt::Display, caller: &Location<'_>) {
        // The file was picked for this instant; the line is stamped with it too.
        let now = self.clock().now();
        let Some(handle) = self.resolve_at(name, now) else {
            return;
        };
        if !handle.enabled(level) {
            return;
        }
        self.write(&handle, now, level, message, caller);
    }

    fn write(
        &self,
        handle: &LoggerHandle,
        now: NaiveDateTime,
        level: Level,
        message: &dyn fmt::Display,
        caller: &Location<'_>,
    ) {
        let prefix = format!(
            "{} {}:{}:",
            now.format("%Y/%m/%d %H:%M:%S"),
            short_file(caller.file()),
            caller.line()
        );
        let body = message.to_string();
        let body = body.strip_suffix('\n').unwrap_or(&body);

        if let Some(file) = handle.file() {
            match file.write_line(&format!("{prefix} [{level}] {body}")) {
                Ok(()) => metrics::record_line_written("file"),
                Err(e) => tracing::debug!(
                    path = %file.path().display(),
                    error = %e,
                    "Log file write failed"
                ),
            }
        }

        if handle.has_console() {
            let line = format!("{prefix} [{}] [{level}] {body}", handle.name());
            match self.console().write_line(&line) {
                Ok(()) => metrics::record_line_written("console"),
                Err(e) => tracing::debug!(error = %e, "Console write failed"),
            }
        }
    }
}

fn short_file(file: &str) -> &str {
    Path::new(file)
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::sink::memory::{MemoryConsole, MemoryFileSystem};
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counted<'a>(&'a AtomicUsize);

    impl fmt::Display for Counted<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.fetch_add(1, Ordering::SeqCst);
            f.write_str("counted")
        }
    }

    fn fixture() -> (Registry, Arc<MemoryFileSystem>, Arc<MemoryConsole>) {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.write_file("log.json", r#"{"Out":"file,console","Level":2,"FileDir":"logs"}"#);
        let console = Arc::new(MemoryConsole::new());
        let start = NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .unwrap();
        let registry = Registry::builder()
            .file_system(fs.clone())
            .console(console.clone())
            .clock(Arc::new(ManualClock::new(start)))
            .build();
        (registry, fs, console)
    }

    #[test]
    fn join_uses_single_spaces() {
        let parts: [&dyn fmt::Display; 3] = [&"a", &1, &'c'];
        assert_eq!(Join(&parts).to_string(), "a 1 c");
        assert_eq!(Join(&[]).to_string(), "");
    }

    #[test]
    fn file_and_console_lines_differ_by_name() {
        let (registry, fs, console) = fixture();
        registry.info("svc", format_args!("hello {}", "world"));

        let file_lines = fs.lines("logs/svc.log");
        assert_eq!(file_lines.len(), 1);
        assert!(file_lines[0].starts_with("2024/03/05 09:30:00 emit.rs:"));
        assert!(file_lines[0].ends_with(" [INFO] hello world"));

        let console_lines = console.lines();
        assert_eq!(console_lines.len(), 1);
        assert!(console_lines[0].ends_with(" [svc] [INFO] hello world"));
    }

    #[test]
    fn filtered_calls_do_not_format() {
        let (registry, fs, console) = fixture();
        let calls = AtomicUsize::new(0);

        registry.debug("svc", format_args!("{}", Counted(&calls)));
        registry.debug_join("svc", &[&Counted(&calls)]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(fs.lines("logs/svc.log").is_empty());
        assert!(console.lines().is_empty());

        registry.error_join("svc", &[&"boom", &Counted(&calls)]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(fs.lines("logs/svc.log")[0].ends_with("[ERROR] boom counted"));
    }

    #[test]
    fn trailing_newline_is_not_doubled() {
        let (registry, fs, _console) = fixture();
        registry.warning("svc", format_args!("line\n"));
        assert_eq!(fs.contents("logs/svc.log").unwrap().matches('\n').count(), 1);
    }

    /// Moves forward one second on every read.
    struct TickingClock(ManualClock);

    impl Clock for TickingClock {
        fn now(&self) -> NaiveDateTime {
            let now = self.0.now();
            self.0.advance(chrono::Duration::seconds(1));
            now
        }
    }

    #[test]
    fn line_timestamp_matches_the_file_date() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.write_file("log.json", r#"{"FileSplit":2,"FileDir":"logs"}"#);
        let start = NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .unwrap();
        let registry = Registry::builder()
            .file_system(fs.clone())
            .console(Arc::new(MemoryConsole::new()))
            .clock(Arc::new(TickingClock(ManualClock::new(start))))
            .build();

        registry.info("svc", format_args!("at midnight"));

        let lines = fs.lines("logs/svc_2024-3-5.log");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("2024/03/05 23:59:59 "), "{}", lines[0]);
        assert!(!fs.file_exists("logs/svc_2024-3-6.log"));
    }

    #[test]
    fn unavailable_handle_is_silent() {
        let (registry, fs, console) = fixture();
        fs.fail_opens_under("logs");

        registry.error("svc", format_args!("lost"));
        assert!(console.lines().is_empty());
        assert!(!fs.file_exists("logs/svc.log"));
    }
}
