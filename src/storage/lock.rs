//! Exclusive ownership of a data directory
//!
//! A `FileStore` assigns ids from the highest id it read at open time, so two
//! live handles on one directory would hand out the same ids. Opening takes
//! `<data_dir>/.lock` with `create_new`; the file is removed when the guard
//! drops. A lock left behind by a killed process must be removed by hand.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};

/// Lock file name inside the data directory
pub const LOCK_FILE: &str = ".lock";

/// Held for as long as a store owns its data directory.
#[derive(Debug)]
pub struct DirLock {
    path: PathBuf,
}

impl DirLock {
    /// Takes the lock on `data_dir`, which must already exist.
    pub fn acquire(data_dir: &Path) -> StorageResult<Self> {
        let path = data_dir.join(LOCK_FILE);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => StorageError::locked(&path),
                _ => StorageError::io_error(
                    format!("Failed to create lock file: {}", path.display()),
                    e,
                ),
            })?;

        // Owner pid, for whoever finds a stale lock.
        if let Err(e) = writeln!(file, "{}", std::process::id()) {
            let _ = fs::remove_file(&path);
            return Err(StorageError::io_error("Failed to write lock file", e));
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DirLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
