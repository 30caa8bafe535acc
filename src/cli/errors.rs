//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code. Errors raised
//! by the library keep their own code and may carry extra JSON fields for the
//! error response.

use std::fmt;
use std::io;

use serde_json::{Map, Value};

use crate::ingest::ImportFailure;
use crate::query::QueryError;
use crate::storage::StorageError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout)
    IoError,
    /// Already initialized
    AlreadyInitialized,
    /// Not initialized
    NotInitialized,
    /// Rejected by the library; carries the library's code
    Operation(&'static str),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "SALARY_CLI_CONFIG_ERROR",
            Self::IoError => "SALARY_CLI_IO_ERROR",
            Self::AlreadyInitialized => "SALARY_CLI_ALREADY_INITIALIZED",
            Self::NotInitialized => "SALARY_CLI_NOT_INITIALIZED",
            Self::Operation(code) => code,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
    fields: Map<String, Value>,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fields: Map::new(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn already_initialized() -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            "Data directory already initialized",
        )
    }

    pub fn not_initialized() -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            "Data directory not initialized. Run 'salarydb init' first.",
        )
    }

    /// Adds a field to the JSON error response
    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Extra fields for the JSON error response
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        Self::new(CliErrorCode::Operation(e.code().code()), e.to_string())
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        Self::new(CliErrorCode::Operation(e.code()), e.to_string())
            .with_field("statusCode", Value::from(e.status_code()))
    }
}

impl From<ImportFailure> for CliError {
    fn from(failure: ImportFailure) -> Self {
        let mut err = Self::new(CliErrorCode::Operation(failure.code), failure.message.clone());
        if let Ok(Value::Object(fields)) = serde_json::to_value(&failure) {
            err.fields = fields
                .into_iter()
                .filter(|(key, _)| key != "code" && key != "message")
                .collect();
        }
        err
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
