//! Per-row acceptance policy
//!
//! A rejected row is skipped, not an error: the import carries on with the
//! next row. Parse problems never reach this layer.

use std::fmt;

use super::row::ParsedRow;

/// Why a parsed row was not persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NegativeSalary,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::NegativeSalary => "negative_salary",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(RejectReason),
}

/// Decides whether a parsed row is persisted.
pub struct RecordValidator;

impl RecordValidator {
    pub fn check(row: &ParsedRow) -> Verdict {
        if row.salary < 0.0 {
            Verdict::Reject(RejectReason::NegativeSalary)
        } else {
            Verdict::Accept
        }
    }
}
