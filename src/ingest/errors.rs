//! Ingestion error types
//!
//! Every variant aborts the current import and rolls back its transaction.
//! The row-level skip for negative salaries is not an error and never
//! appears here.

use std::io;

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for ingestion
pub type IngestResult<T> = Result<T, ImportError>;

/// Why a data row could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowFault {
    #[error("expected 2 fields, found {found}")]
    FieldCount { found: usize },

    #[error("salary is not a number")]
    InvalidSalary,

    #[error("salary is not finite")]
    NonFiniteSalary,

    #[error("name is empty")]
    EmptyName,

    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    #[error("unreadable CSV: {0}")]
    Unreadable(String),
}

#[derive(Debug, Error)]
pub enum ImportError {
    /// First line is missing or is not exactly `NAME,SALARY`
    #[error("Invalid header at line {line}: expected NAME,SALARY, found '{content}'")]
    Header { line: usize, content: String },

    /// A data row failed to parse
    #[error("Malformed row at line {line} ({fault}): '{content}'")]
    Row {
        line: usize,
        content: String,
        fault: RowFault,
    },

    /// The input could not be opened
    #[error("Failed to open input: {0}")]
    Input(#[source] io::Error),

    /// Reading the input failed part way
    #[error("Failed to read input at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ImportError {
    pub fn header(content: impl Into<String>) -> Self {
        ImportError::Header {
            line: 1,
            content: content.into(),
        }
    }

    pub fn row(line: usize, content: impl Into<String>, fault: RowFault) -> Self {
        ImportError::Row {
            line,
            content: content.into(),
            fault,
        }
    }

    /// Caller-facing error kind
    pub fn error_kind(&self) -> &'static str {
        match self {
            ImportError::Header { .. } => "header",
            ImportError::Row { .. } => "row",
            ImportError::Input(_) | ImportError::Read { .. } => "input",
            ImportError::Storage(_) => "storage",
        }
    }

    /// Offending 1-based line, if the error is tied to one
    pub fn line(&self) -> Option<usize> {
        match self {
            ImportError::Header { line, .. }
            | ImportError::Row { line, .. }
            | ImportError::Read { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Raw text of the offending line, if any
    pub fn content(&self) -> Option<&str> {
        match self {
            ImportError::Header { content, .. } | ImportError::Row { content, .. } => {
                Some(content)
            }
            _ => None,
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ImportError::Header { .. } => "SALARY_IMPORT_INVALID_HEADER",
            ImportError::Row { .. } => "SALARY_IMPORT_MALFORMED_ROW",
            ImportError::Input(_) | ImportError::Read { .. } => "SALARY_IMPORT_INPUT_ERROR",
            ImportError::Storage(e) => e.code().code(),
        }
    }

    /// HTTP-equivalent status code
    pub fn status_code(&self) -> u16 {
        match self {
            ImportError::Header { .. } => 400,
            ImportError::Row { .. } => 422,
            ImportError::Input(_) | ImportError::Read { .. } => 400,
            ImportError::Storage(e) if e.is_fatal() => 503,
            ImportError::Storage(_) => 500,
        }
    }
}
