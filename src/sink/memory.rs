//! In-process file system and console.
//!
//! Used by the test suite to drive the registry deterministically, and
//! usable by embedders that want to capture log output.

use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::sink::{Console, FileSystem};

/// A file open or close, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEvent {
    Opened(PathBuf),
    Closed(PathBuf),
}

type Buffer = Arc<Mutex<Vec<u8>>>;

#[derive(Default)]
struct MemoryState {
    files: HashMap<PathBuf, Buffer>,
    dirs: HashSet<PathBuf>,
    failing: Vec<PathBuf>,
}

/// A file system held entirely in memory.
#[derive(Default)]
pub struct MemoryFileSystem {
    state: Mutex<MemoryState>,
    events: Arc<Mutex<Vec<FsEvent>>>,
    open_handles: Arc<AtomicUsize>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents of `path`.
    pub fn write_file(&self, path: impl AsRef<Path>, contents: &str) {
        let mut state = self.state.lock();
        let buffer = state.files.entry(path.as_ref().to_path_buf()).or_default();
        *buffer.lock() = contents.as_bytes().to_vec();
    }

    pub fn remove_file(&self, path: impl AsRef<Path>) {
        self.state.lock().files.remove(path.as_ref());
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        let state = self.state.lock();
        let buffer = state.files.get(path.as_ref())?;
        let text = String::from_utf8_lossy(&buffer.lock()).into_owned();
        Some(text)
    }

    /// Lines of `path`; empty when the file does not exist.
    pub fn lines(&self, path: impl AsRef<Path>) -> Vec<String> {
        self.contents(path)
            .map(|c| c.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn file_exists(&self, path: impl AsRef<Path>) -> bool {
        self.state.lock().files.contains_key(path.as_ref())
    }

    pub fn dir_exists(&self, dir: impl AsRef<Path>) -> bool {
        self.state.lock().dirs.contains(dir.as_ref())
    }

    /// Make every open under `prefix` fail with `PermissionDenied`.
    pub fn fail_opens_under(&self, prefix: impl AsRef<Path>) {
        self.state.lock().failing.push(prefix.as_ref().to_path_buf());
    }

    pub fn clear_failures(&self) {
        self.state.lock().failing.clear();
    }

    /// Number of times `path` has been opened for appending.
    pub fn open_count(&self, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, FsEvent::Opened(p) if p == path))
            .count()
    }

    /// Writers currently alive.
    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<FsEvent> {
        self.events.lock().clone()
    }
}

impl FileSystem for MemoryFileSystem {
    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        let mut state = self.state.lock();
        for ancestor in dir.ancestors().filter(|a| !a.as_os_str().is_empty()) {
            state.dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn open_append(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        let mut state = self.state.lock();
        if state.failing.iter().any(|prefix| path.starts_with(prefix)) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }

        let buffer = Arc::clone(state.files.entry(path.to_path_buf()).or_default());
        self.open_handles.fetch_add(1, Ordering::SeqCst);
        self.events.lock().push(FsEvent::Opened(path.to_path_buf()));

        Ok(Box::new(MemoryFile {
            path: path.to_path_buf(),
            buffer,
            events: Arc::clone(&self.events),
            open_handles: Arc::clone(&self.open_handles),
        }))
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.contents(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

struct MemoryFile {
    path: PathBuf,
    buffer: Buffer,
    events: Arc<Mutex<Vec<FsEvent>>>,
    open_handles: Arc<AtomicUsize>,
}

impl Write for MemoryFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MemoryFile {
    fn drop(&mut self) {
        self.open_handles.fetch_sub(1, Ordering::SeqCst);
        self.events.lock().push(FsEvent::Closed(self.path.clone()));
    }
}

/// A console that keeps every line.
#[derive(Debug, Default)]
pub struct MemoryConsole {
    lines: Mutex<Vec<String>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl Console for MemoryConsole {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.lines.lock().push(line.to_string());
        Ok(())
    }
}
