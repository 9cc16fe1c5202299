//! Output destinations.
//!
//! # Responsibilities
//! - Abstract the file system and the console behind small traits
//! - Own exactly one append-only file per handle ([`FileSink`])
//!
//! # Design Decisions
//! - The console is process-wide and shared; handles only carry a flag
//! - File sinks can be closed while other threads still hold the handle;
//!   writes after close are dropped silently
//! - `memory.rs` provides in-process backends for tests and embedders

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

pub mod memory;
pub mod os;

pub use memory::{FsEvent, MemoryConsole, MemoryFileSystem};
pub use os::{OsFileSystem, StdoutConsole};

/// File-system capability used for config reads and log files.
pub trait FileSystem: Send + Sync {
    fn create_dir_all(&self, dir: &Path) -> io::Result<()>;

    /// Open `path` create-if-absent, append-only.
    fn open_append(&self, path: &Path) -> io::Result<Box<dyn Write + Send>>;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// The shared console stream.
pub trait Console: Send + Sync {
    fn write_line(&self, line: &str) -> io::Result<()>;
}

/// Errors raised while opening a file sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to create log directory {}: {source}", .dir.display())]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An append-only log file owned by a single handle.
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<Option<Box<dyn Write + Send>>>,
}

impl FileSink {
    /// Create the parent directory if needed, then open the file.
    pub fn open(fs: &dyn FileSystem, path: &Path) -> Result<Self, SinkError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs.create_dir_all(dir).map_err(|source| SinkError::CreateDir {
                dir: dir.to_path_buf(),
                source,
            })?;
        }

        let writer = fs.open_append(path).map_err(|source| SinkError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(Some(writer)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `line` followed by a newline. No-op once closed.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut guard = self.writer.lock();
        let Some(writer) = guard.as_mut() else {
            return Ok(());
        };
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()
    }

    /// Flush and release the underlying file.
    pub fn close(&self) {
        if let Some(mut writer) = self.writer.lock().take() {
            if let Err(e) = writer.flush() {
                tracing::debug!(path = %self.path.display(), error = %e, "Flush on close failed");
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.writer.lock().is_none()
    }
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("path", &self.path)
            .field("closed", &self.is_closed())
            .finish()
    }
}
