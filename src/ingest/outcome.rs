//! Import results as seen by callers

use serde::Serialize;

use super::errors::{ImportError, IngestResult};

/// Summary of a committed import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    /// Rows persisted by this import
    pub accepted_count: usize,
    /// Rows parsed but rejected by the record validator
    pub skipped_count: usize,
    /// Physical lines read, header included
    pub lines_read: usize,
}

/// Failure descriptor of an aborted import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFailure {
    pub error_kind: &'static str,
    pub code: &'static str,
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl From<&ImportError> for ImportFailure {
    fn from(err: &ImportError) -> Self {
        Self {
            error_kind: err.error_kind(),
            code: err.code(),
            status_code: err.status_code(),
            message: err.to_string(),
            line: err.line(),
            content: err.content().map(str::to_string),
        }
    }
}

/// Either a committed outcome or the reason nothing was committed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ImportReport {
    Committed(ImportOutcome),
    Failed(ImportFailure),
}

impl ImportReport {
    pub fn is_committed(&self) -> bool {
        matches!(self, ImportReport::Committed(_))
    }

    /// Rows persisted; zero for a failed import
    pub fn accepted_count(&self) -> usize {
        match self {
            ImportReport::Committed(outcome) => outcome.accepted_count,
            ImportReport::Failed(_) => 0,
        }
    }
}

impl From<&IngestResult<ImportOutcome>> for ImportReport {
    fn from(result: &IngestResult<ImportOutcome>) -> Self {
        match result {
            Ok(outcome) => ImportReport::Committed(*outcome),
            Err(err) => ImportReport::Failed(err.into()),
        }
    }
}
