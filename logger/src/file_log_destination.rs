use std::fs::{self, File, OpenOptions, rename};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::log_contracts::{LogDestination, LogEntry};

/// JSON-lines log file, rotated to `<name>.log.bak` once it grows past `max_size` bytes.
pub struct FileLogDestination {
    file: Mutex<File>,
    path: PathBuf,
    max_size: u64,
}

impl FileLogDestination {
    pub fn new(path: PathBuf, max_size: u64) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = Self::open(&path)?;

        Ok(Self {
            file: Mutex::new(file),
            path,
            max_size,
        })
    }

    fn open(path: &Path) -> io::Result<File> {
        OpenOptions::new().create(true).append(true).open(path)
    }

    fn rotate_if_needed(&self, file: &mut File) {
        let Ok(metadata) = file.metadata() else {
            return;
        };
        if metadata.len() <= self.max_size {
            return;
        }
        let _ = rename(&self.path, self.path.with_extension("log.bak"));
        if let Ok(fresh) = Self::open(&self.path) {
            *file = fresh;
        }
    }
}

impl LogDestination for FileLogDestination {
    fn write_log(&self, entry: &LogEntry) {
        let Ok(json) = serde_json::to_string(entry) else {
            return;
        };
        let mut file = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.rotate_if_needed(&mut file);
        let _ = writeln!(file, "{}", json);
    }
}
