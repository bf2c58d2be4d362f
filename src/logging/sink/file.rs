//! File sink writer.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::logging::record::Severity;
use crate::logging::sink::{SinkError, SinkWriter};

/// Appends lines to a file on disk.
pub struct FileWriter {
    file: Mutex<File>,
    path: PathBuf,
}

impl FileWriter {
    /// Open `path` for appending, creating missing parent directories.
    pub fn open(path: &Path) -> Result<Self, SinkError> {
        let io_err = |source| SinkError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(io_err)?;

        Ok(Self {
            file: Mutex::new(file),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SinkWriter for FileWriter {
    fn write_line(&self, _severity: Severity, line: &str) -> io::Result<()> {
        let mut file = self.file.lock();
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        file.write_all(&buf)?;
        file.flush()
    }
}
