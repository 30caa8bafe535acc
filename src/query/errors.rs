//! Query error types
//!
//! Parameter errors are raised while building `QueryParams`, before any
//! store is consulted. Storage errors pass through unmodified.

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid salary range: min {min} is greater than max {max}")]
    InvalidRange { min: f64, max: f64 },

    #[error("Salary bound '{0}' must be a finite number")]
    NonFiniteBound(&'static str),

    #[error("Offset must not be negative: {0}")]
    NegativeOffset(i64),

    #[error("Limit must be a positive integer: {0}")]
    InvalidLimit(i64),

    #[error("Unknown sort type '{0}', expected NAME or SALARY")]
    UnknownSortToken(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl QueryError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::InvalidRange { .. } => "SALARY_QUERY_INVALID_RANGE",
            QueryError::NonFiniteBound(_) => "SALARY_QUERY_INVALID_BOUND",
            QueryError::NegativeOffset(_) => "SALARY_QUERY_INVALID_OFFSET",
            QueryError::InvalidLimit(_) => "SALARY_QUERY_INVALID_LIMIT",
            QueryError::UnknownSortToken(_) => "SALARY_QUERY_UNKNOWN_SORT",
            QueryError::Storage(e) => e.code().code(),
        }
    }

    /// HTTP-equivalent status code
    pub fn status_code(&self) -> u16 {
        match self {
            QueryError::Storage(e) if e.is_fatal() => 503,
            QueryError::Storage(_) => 500,
            _ => 400,
        }
    }

    /// Returns true when the caller supplied bad parameters
    pub fn is_param_error(&self) -> bool {
        !matches!(self, QueryError::Storage(_))
    }
}
