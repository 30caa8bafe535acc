//! Durable, append-only record store
//!
//! Layout: `<data_dir>/data/salaries.dat`, a sequence of checksummed frames
//! in id order. A transaction stages records in memory; commit appends the
//! whole batch with one write and one fsync. The store has no secondary
//! index, so range queries are left to the query engine over `scan`.
//! The handle holds `<data_dir>/.lock` until it drops.

use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::lock::DirLock;
use super::reader::RecordReader;
use super::record::{NewRecord, Record, RecordId};
use super::store::{begin_staging, RecordStore, StagedWrites};
use super::writer::RecordWriter;
use crate::observability::Logger;

/// Subdirectory of the data directory holding the record file
pub const DATA_SUBDIR: &str = "data";

/// Record file name
pub const RECORD_FILE: &str = "salaries.dat";

/// File-backed transactional store.
pub struct FileStore {
    path: PathBuf,
    writer: RecordWriter,
    next_id: RecordId,
    record_count: usize,
    staged: Option<StagedWrites>,
    _lock: DirLock,
}

impl FileStore {
    /// Path of the record file under `data_dir`
    pub fn record_path(data_dir: &Path) -> PathBuf {
        data_dir.join(DATA_SUBDIR).join(RECORD_FILE)
    }

    /// Returns true if `data_dir` already holds a record file.
    pub fn exists(data_dir: &Path) -> bool {
        Self::record_path(data_dir).exists()
    }

    /// Opens the store, creating the directory and file if missing.
    ///
    /// Every existing frame is read and verified; corruption is fatal.
    /// Fails with `Locked` while another handle has the directory open.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        let data_subdir = data_dir.join(DATA_SUBDIR);
        fs::create_dir_all(&data_subdir).map_err(|e| {
            StorageError::io_error(
                format!("Failed to create data directory: {}", data_subdir.display()),
                e,
            )
        })?;
        let lock = DirLock::acquire(data_dir)?;

        let path = data_subdir.join(RECORD_FILE);
        let writer = RecordWriter::open(&path)?;
        let existing = RecordReader::open(&path)?.read_all()?;

        let next_id = existing
            .iter()
            .map(|r| r.id)
            .max()
            .map(|id| id.next())
            .unwrap_or_else(|| RecordId::new(1));

        let record_count = existing.len();
        let count = record_count.to_string();
        Logger::info(
            "STORE_OPENED",
            &[("path", &path.display().to_string()), ("records", &count)],
        );

        Ok(Self {
            path,
            writer,
            next_id,
            record_count,
            staged: None,
            _lock: lock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of committed records
    pub fn len(&self) -> usize {
        self.record_count
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

impl RecordStore for FileStore {
    fn begin(&mut self) -> StorageResult<()> {
        begin_staging(&mut self.staged, self.next_id)
    }

    fn save(&mut self, record: NewRecord) -> StorageResult<RecordId> {
        let staged = self
            .staged
            .as_mut()
            .ok_or_else(|| StorageError::no_transaction("save"))?;
        Ok(staged.stage(record))
    }

    fn commit(&mut self) -> StorageResult<()> {
        let staged = self
            .staged
            .take()
            .ok_or_else(|| StorageError::no_transaction("commit"))?;

        self.writer.append_batch(staged.records())?;
        self.next_id = staged.next_id();
        self.record_count += staged.records().len();
        Ok(())
    }

    fn rollback(&mut self) -> StorageResult<()> {
        self.staged
            .take()
            .map(|_| ())
            .ok_or_else(|| StorageError::no_transaction("rollback"))
    }

    fn in_transaction(&self) -> bool {
        self.staged.is_some()
    }

    fn scan(&self) -> StorageResult<Vec<Record>> {
        RecordReader::open(&self.path)?.read_all()
    }
}
