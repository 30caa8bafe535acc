//! Storage error types
//!
//! Error codes:
//! - SALARY_STORAGE_IO_ERROR (ERROR)
//! - SALARY_STORAGE_WRITE_FAILED (ERROR)
//! - SALARY_STORAGE_READ_FAILED (ERROR)
//! - SALARY_TRANSACTION_STATE (ERROR)
//! - SALARY_STORAGE_UNSUPPORTED (ERROR)
//! - SALARY_STORAGE_LOCKED (ERROR)
//! - SALARY_DATA_CORRUPTION (FATAL)

use std::fmt;
use std::io;
use std::path::Path;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, the store remains usable
    Error,
    /// The store must not be used further
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Disk I/O failure outside a read or write (directory setup, metadata)
    IoError,
    /// Appending records failed
    WriteFailed,
    /// Reading records failed
    ReadFailed,
    /// begin/commit/rollback/save called in the wrong transaction state
    TransactionState,
    /// The store does not implement the requested operation
    Unsupported,
    /// Another handle owns the data directory
    Locked,
    /// Record checksum or framing failure
    DataCorruption,
}

impl StorageErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::IoError => "SALARY_STORAGE_IO_ERROR",
            StorageErrorCode::WriteFailed => "SALARY_STORAGE_WRITE_FAILED",
            StorageErrorCode::ReadFailed => "SALARY_STORAGE_READ_FAILED",
            StorageErrorCode::TransactionState => "SALARY_TRANSACTION_STATE",
            StorageErrorCode::Unsupported => "SALARY_STORAGE_UNSUPPORTED",
            StorageErrorCode::Locked => "SALARY_STORAGE_LOCKED",
            StorageErrorCode::DataCorruption => "SALARY_DATA_CORRUPTION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StorageErrorCode::DataCorruption => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error with code, message and optional context
#[derive(Debug)]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl StorageError {
    fn new(code: StorageErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    fn with_source(mut self, source: io::Error) -> Self {
        self.source = Some(source);
        self
    }

    fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Create a storage I/O error
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StorageErrorCode::IoError, message).with_source(source)
    }

    /// Create a write failed error
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StorageErrorCode::WriteFailed, message).with_source(source)
    }

    /// Create a read failed error
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StorageErrorCode::ReadFailed, message).with_source(source)
    }

    /// Create a transaction state error
    pub fn transaction_state(message: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::TransactionState, message)
    }

    /// A transaction was required but none is open
    pub fn no_transaction(operation: &str) -> Self {
        Self::transaction_state(format!("{} requires an open transaction", operation))
    }

    /// Create an unsupported operation error
    pub fn unsupported(operation: &str) -> Self {
        Self::new(
            StorageErrorCode::Unsupported,
            format!("{} is not supported by this store", operation),
        )
    }

    /// The data directory is already owned by another store handle
    pub fn locked(lock_path: &Path) -> Self {
        Self::new(
            StorageErrorCode::Locked,
            "Data directory is in use by another process",
        )
        .with_details(format!("lock_file: {}", lock_path.display()))
    }

    /// Create a data corruption error (FATAL)
    pub fn data_corruption(message: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::DataCorruption, message)
    }

    /// Create a data corruption error with byte offset context
    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        Self::data_corruption(reason).with_details(format!("byte_offset: {}", offset))
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether the store must stop serving
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_only_corruption_is_fatal() {
        assert!(StorageError::data_corruption("bad frame").is_fatal());
        assert!(!StorageError::transaction_state("begin twice").is_fatal());
        assert!(!StorageError::unsupported("find_by_salary_range").is_fatal());
        assert!(!StorageError::write_failed("disk full", io::Error::other("full")).is_fatal());
    }

    #[test]
    fn test_io_source_is_exposed() {
        let err = StorageError::read_failed("open failed", io::Error::other("denied"));
        assert!(err.source().is_some());
        assert!(StorageError::no_transaction("save").source().is_none());
    }

    #[test]
    fn test_display_contains_code_and_offset() {
        let err = StorageError::corruption_at_offset(56, "checksum mismatch");
        let display = err.to_string();
        assert!(display.contains("SALARY_DATA_CORRUPTION"));
        assert!(display.contains("FATAL"));
        assert!(display.contains("checksum mismatch"));
        assert!(display.contains("byte_offset: 56"));
    }

    #[test]
    fn test_no_transaction_message_names_operation() {
        let err = StorageError::no_transaction("commit");
        assert_eq!(err.code(), StorageErrorCode::TransactionState);
        assert!(err.message().starts_with("commit"));
    }
}
