//! Append-only writer for the record file
//!
//! A batch of records is written with a single `write_all` followed by
//! `sync_all`. If either fails the file is truncated back to its length
//! before the batch, so a failed commit leaves no partial frames behind.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::record::Record;

/// Appends checksummed record frames.
pub struct RecordWriter {
    path: PathBuf,
    file: File,
    current_offset: u64,
}

impl RecordWriter {
    /// Opens (creating if needed) the record file for append.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to open record file: {}", path.display()),
                    e,
                )
            })?;

        let current_offset = file
            .metadata()
            .map_err(|e| StorageError::write_failed("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            path: path.to_path_buf(),
            file,
            current_offset,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte length of the file as last written.
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Appends all `records` durably, or none of them.
    pub fn append_batch(&mut self, records: &[Record]) -> StorageResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let batch: Vec<u8> = records.iter().flat_map(Record::encode).collect();

        let written = self
            .file
            .write_all(&batch)
            .and_then(|_| self.file.sync_all());

        if let Err(e) = written {
            // Best effort: a failed truncate is surfaced as corruption on next open.
            let _ = self.truncate_to_committed();
            return Err(StorageError::write_failed(
                format!(
                    "Failed to append {} record(s) to {}",
                    records.len(),
                    self.path.display()
                ),
                e,
            ));
        }

        self.current_offset += batch.len() as u64;
        Ok(())
    }

    /// Cuts the file back to the length of the last successful batch.
    fn truncate_to_committed(&mut self) -> io::Result<()> {
        self.file.set_len(self.current_offset)
    }

    /// Opens `path` without write access, so every append fails.
    #[cfg(test)]
    pub(crate) fn open_read_only(path: &Path) -> StorageResult<Self> {
        let file = File::open(path)
            .map_err(|e| StorageError::read_failed("Failed to open record file", e))?;
        let current_offset = file
            .metadata()
            .map_err(|e| StorageError::read_failed("Failed to read file metadata", e))?
            .len();
        Ok(Self {
            path: path.to_path_buf(),
            file,
            current_offset,
        })
    }
}
