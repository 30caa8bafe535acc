//! Observers for rows skipped during ingestion
//!
//! The pipeline reports every rejected row to a `SkipReporter` chosen by
//! the caller. Nothing is written to the log unless the caller passes a
//! `LogReporter`.

use super::validator::RejectReason;
use crate::observability::Logger;

/// A data row that parsed but was not persisted
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub line: usize,
    pub name: String,
    pub salary: f64,
    pub reason: RejectReason,
}

/// Receives rows rejected by the record validator.
pub trait SkipReporter {
    fn row_skipped(&mut self, row: &SkippedRow);
}

impl<R: SkipReporter + ?Sized> SkipReporter for &mut R {
    fn row_skipped(&mut self, row: &SkippedRow) {
        (**self).row_skipped(row)
    }
}

/// Writes each skip to the structured log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl SkipReporter for LogReporter {
    fn row_skipped(&mut self, row: &SkippedRow) {
        let line = row.line.to_string();
        let salary = row.salary.to_string();
        Logger::info(
            "IMPORT_ROW_SKIPPED",
            &[
                ("line", &line),
                ("name", &row.name),
                ("salary", &salary),
                ("reason", row.reason.as_str()),
            ],
        );
    }
}

/// Discards skips
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl SkipReporter for SilentReporter {
    fn row_skipped(&mut self, _row: &SkippedRow) {}
}

/// Keeps skips in memory
#[derive(Debug, Default, Clone)]
pub struct CollectingReporter {
    skipped: Vec<SkippedRow>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    /// Line numbers of skipped rows, in input order
    pub fn lines(&self) -> Vec<usize> {
        self.skipped.iter().map(|row| row.line).collect()
    }
}

impl SkipReporter for CollectingReporter {
    fn row_skipped(&mut self, row: &SkippedRow) {
        self.skipped.push(row.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skipped(line: usize) -> SkippedRow {
        SkippedRow {
            line,
            name: "Bob".into(),
            salary: -100.0,
            reason: RejectReason::NegativeSalary,
        }
    }

    #[test]
    fn test_collecting_reporter_keeps_order() {
        let mut reporter = CollectingReporter::new();
        reporter.row_skipped(&skipped(3));
        reporter.row_skipped(&skipped(7));
        assert_eq!(reporter.lines(), vec![3, 7]);
        assert_eq!(reporter.skipped()[0].name, "Bob");
    }

    #[test]
    fn test_reporter_through_mut_ref() {
        fn report<R: SkipReporter>(mut reporter: R) {
            reporter.row_skipped(&skipped(2));
        }

        let mut reporter = CollectingReporter::new();
        report(&mut reporter);
        assert_eq!(reporter.lines(), vec![2]);
    }
}
