//! CSV ingestion
//!
//! Reads `NAME,SALARY` files and persists their rows through a
//! `RecordStore`, all or nothing:
//! - the header must match exactly
//! - a malformed row aborts the import and rolls back every saved row
//! - a row with a negative salary is skipped and reported

mod errors;
mod header;
mod outcome;
mod pipeline;
mod reporter;
mod row;
mod validator;

pub use errors::{ImportError, IngestResult, RowFault};
pub use header::{Column, HeaderValidator};
pub use outcome::{ImportFailure, ImportOutcome, ImportReport};
pub use pipeline::{IngestOptions, IngestionPipeline};
pub use reporter::{CollectingReporter, LogReporter, SilentReporter, SkipReporter, SkippedRow};
pub use row::{split_fields, EmptyNamePolicy, LineReader, ParsedRow, RawLine, RowParser};
pub use validator::{RecordValidator, RejectReason, Verdict};
