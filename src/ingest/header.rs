//! Header validation
//!
//! The first line must split into exactly the expected columns, in order,
//! compared case-sensitively.

use super::errors::{ImportError, IngestResult};
use super::row::{split_fields, RawLine};

/// Columns of an import file, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Salary,
}

impl Column {
    /// Expected header, in column order
    pub const ALL: [Column; 2] = [Column::Name, Column::Salary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Name => "NAME",
            Column::Salary => "SALARY",
        }
    }

    /// The header line a valid file starts with
    pub fn header_line() -> String {
        Self::ALL.map(|c| c.as_str()).join(",")
    }
}

/// Checks the first line of an import.
pub struct HeaderValidator;

impl HeaderValidator {
    /// Header errors always point at this line
    pub const LINE_NUMBER: usize = 1;

    /// Returns true if `line` is exactly the expected header.
    ///
    /// Quoted column names are unquoted before comparing.
    pub fn is_valid(line: &str) -> bool {
        let Ok(fields) = split_fields(line) else {
            return false;
        };
        fields.len() == Column::ALL.len()
            && fields
                .iter()
                .zip(Column::ALL.iter())
                .all(|(field, column)| *field == column.as_str())
    }

    /// Validates the first line read from the input.
    ///
    /// `None` means the input was empty, which is also a header error.
    pub fn validate(first: Option<&RawLine>) -> IngestResult<()> {
        match first {
            Some(line) if line.valid_utf8 && Self::is_valid(&line.content) => Ok(()),
            Some(line) => Err(ImportError::header(line.content.clone())),
            None => Err(ImportError::header("")),
        }
    }
}
