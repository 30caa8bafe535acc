//! Observability for salarydb
//!
//! Structured JSON logging only. Components that need to report per-row
//! decisions take an observer (see `ingest::SkipReporter`) instead of
//! writing here directly, so callers choose whether skips reach the log.
//!
//! # Usage
//!
//! ```ignore
//! use salarydb::observability::{Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! Logger::info("IMPORT_COMMITTED", &[("accepted", "2")]);
//! ```

mod logger;

pub use logger::{Logger, Severity};
