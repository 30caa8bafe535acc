//! Record storage for salarydb
//!
//! The `RecordStore` trait is the persistence contract consumed by both the
//! ingestion pipeline and the query engine. Two implementations ship:
//!
//! - `MemoryStore`: transactional, evaluates range queries natively
//! - `FileStore`: durable append-only file, scan-only
//!
//! # Design Principles
//!
//! - Writes only inside a transaction; commit is all-or-nothing
//! - Identifiers are assigned by the store, sequentially from 1
//! - One `FileStore` handle per data directory at a time
//! - Checksum-verified on every read; corruption is fatal

mod checksum;
mod errors;
mod file;
mod lock;
mod memory;
mod reader;
mod record;
mod store;
mod writer;

pub use checksum::compute_checksum;
pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use file::{FileStore, DATA_SUBDIR, RECORD_FILE};
pub use lock::{DirLock, LOCK_FILE};
pub use memory::MemoryStore;
pub use reader::RecordReader;
pub use record::{NewRecord, Record, RecordId};
pub use store::RecordStore;
pub use writer::RecordWriter;
