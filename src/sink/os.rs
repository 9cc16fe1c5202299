//! Real file system and stdout.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::sink::{Console, FileSystem};

/// The process file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }

    fn open_append(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;
        Ok(Box::new(file))
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// Process stdout. Each line is written under the stdout lock so lines from
/// different threads do not interleave.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_never_truncate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/app.log");
        let fs = OsFileSystem;

        fs.create_dir_all(path.parent().unwrap()).unwrap();
        fs.open_append(&path).unwrap().write_all(b"one\n").unwrap();
        fs.open_append(&path).unwrap().write_all(b"two\n").unwrap();

        assert_eq!(fs.read_to_string(&path).unwrap(), "one\ntwo\n");
    }
}
