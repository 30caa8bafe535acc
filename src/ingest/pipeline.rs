//! Ingestion pipeline
//!
//! One import is one transaction on the store:
//!
//! ```text
//! begin ─▶ HeaderCheck ─▶ RowStream ─▶ Commit
//!               │             │
//!               └─────────────┴──────▶ Rollback
//! ```
//!
//! - HeaderCheck: the first line must be exactly `NAME,SALARY`
//! - RowStream: parse each remaining line; a parse failure is fatal,
//!   a negative salary skips the row, anything else is saved
//! - Commit: publish every saved row at once
//! - Rollback: discard every saved row, then return the error that caused it
//!
//! The input stream is owned by the call and released on every exit path.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;

use super::errors::{ImportError, IngestResult, RowFault};
use super::header::HeaderValidator;
use super::outcome::ImportOutcome;
use super::reporter::{SkipReporter, SkippedRow};
use super::row::{EmptyNamePolicy, LineReader, RowParser};
use super::validator::{RecordValidator, Verdict};
use crate::observability::{Logger, Severity};
use crate::storage::{NewRecord, RecordStore};

/// Tunables for one pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct IngestOptions {
    #[serde(default)]
    pub empty_names: EmptyNamePolicy,
}

/// Running counts for one import
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    accepted: usize,
    skipped: usize,
}

/// Ingestion state machine
enum Stage {
    HeaderCheck,
    RowStream,
    Commit(Tally),
    Rollback(ImportError),
}

/// Streams an import file into a store as one atomic unit.
pub struct IngestionPipeline<'a, S: RecordStore + ?Sized, R: SkipReporter + ?Sized> {
    store: &'a mut S,
    reporter: &'a mut R,
    parser: RowParser,
}

impl<'a, S: RecordStore + ?Sized, R: SkipReporter + ?Sized> IngestionPipeline<'a, S, R> {
    pub fn new(store: &'a mut S, reporter: &'a mut R, options: IngestOptions) -> Self {
        Self {
            store,
            reporter,
            parser: RowParser::new(options.empty_names),
        }
    }

    /// Opens `path` and ingests it.
    pub fn ingest_path(&mut self, path: &Path) -> IngestResult<ImportOutcome> {
        let file = File::open(path).map_err(ImportError::Input)?;
        self.ingest(BufReader::new(file))
    }

    /// Ingests one file.
    ///
    /// On success every accepted row is committed. On any error nothing from
    /// this call is visible in the store.
    pub fn ingest<I: BufRead>(&mut self, input: I) -> IngestResult<ImportOutcome> {
        let mut lines = LineReader::new(input);

        self.store.begin()?;
        Logger::info("IMPORT_BEGIN", &[]);

        let mut stage = Stage::HeaderCheck;
        loop {
            stage = match stage {
                Stage::HeaderCheck => match self.check_header(&mut lines) {
                    Ok(()) => Stage::RowStream,
                    Err(err) => Stage::Rollback(err),
                },
                Stage::RowStream => match self.stream_rows(&mut lines) {
                    Ok(tally) => Stage::Commit(tally),
                    Err(err) => Stage::Rollback(err),
                },
                Stage::Commit(tally) => return self.commit(tally, lines.lines_read()),
                Stage::Rollback(err) => return Err(self.rollback(err)),
            };
        }
    }

    fn check_header<I: BufRead>(&mut self, lines: &mut LineReader<I>) -> IngestResult<()> {
        let first = lines
            .next_line()
            .map_err(|source| ImportError::Read { line: 1, source })?;
        HeaderValidator::validate(first.as_ref())
    }

    fn stream_rows<I: BufRead>(&mut self, lines: &mut LineReader<I>) -> IngestResult<Tally> {
        let mut tally = Tally::default();

        loop {
            let line = match lines.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => return Ok(tally),
                Err(source) => {
                    return Err(ImportError::Read {
                        line: lines.lines_read() + 1,
                        source,
                    })
                }
            };

            if line.is_blank() {
                continue;
            }
            if !line.valid_utf8 {
                return Err(ImportError::row(line.number, line.content, RowFault::InvalidUtf8));
            }

            let row = match self.parser.parse(&line.content) {
                Ok(row) => row,
                Err(fault) => return Err(ImportError::row(line.number, line.content, fault)),
            };

            match RecordValidator::check(&row) {
                Verdict::Accept => {
                    let id = self.store.save(NewRecord::new(row.name, row.salary))?;
                    tally.accepted += 1;
                    if Logger::enabled(Severity::Trace) {
                        Logger::trace(
                            "IMPORT_ROW_STAGED",
                            &[("id", &id.to_string()), ("line", &line.number.to_string())],
                        );
                    }
                }
                Verdict::Reject(reason) => {
                    self.reporter.row_skipped(&SkippedRow {
                        line: line.number,
                        name: row.name,
                        salary: row.salary,
                        reason,
                    });
                    tally.skipped += 1;
                }
            }
        }
    }

    fn commit(&mut self, tally: Tally, lines_read: usize) -> IngestResult<ImportOutcome> {
        if let Err(err) = self.store.commit() {
            Logger::error("IMPORT_COMMIT_FAILED", &[("error", &err.to_string())]);
            return Err(err.into());
        }

        let outcome = ImportOutcome {
            accepted_count: tally.accepted,
            skipped_count: tally.skipped,
            lines_read,
        };
        let accepted = outcome.accepted_count.to_string();
        let skipped = outcome.skipped_count.to_string();
        Logger::info(
            "IMPORT_COMMITTED",
            &[("accepted", &accepted), ("skipped", &skipped)],
        );
        Ok(outcome)
    }

    /// Closes the transaction and hands back the error that aborted it.
    ///
    /// A failed rollback is logged; the caller still sees the original error.
    fn rollback(&mut self, err: ImportError) -> ImportError {
        let line = err
            .line()
            .map(|l| l.to_string())
            .unwrap_or_else(|| "none".to_string());

        match self.store.rollback() {
            Ok(()) => Logger::warn(
                "IMPORT_ROLLED_BACK",
                &[
                    ("code", err.code()),
                    ("error_kind", err.error_kind()),
                    ("line", &line),
                ],
            ),
            Err(rollback_err) => Logger::error(
                "IMPORT_ROLLBACK_FAILED",
                &[
                    ("code", err.code()),
                    ("line", &line),
                    ("rollback_error", &rollback_err.to_string()),
                ],
            ),
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::reporter::CollectingReporter;
    use crate::ingest::RowFault;
    use crate::storage::{MemoryStore, Record, RecordId, StorageError, StorageResult};

    fn run(store: &mut MemoryStore, input: &str) -> (IngestResult<ImportOutcome>, Vec<usize>) {
        let mut reporter = CollectingReporter::new();
        let result = IngestionPipeline::new(store, &mut reporter, IngestOptions::default())
            .ingest(input.as_bytes());
        (result, reporter.lines())
    }

    fn names(store: &MemoryStore) -> Vec<String> {
        store.scan().unwrap().into_iter().map(|r| r.name).collect()
    }

    #[test]
    fn test_negative_row_skipped() {
        let mut store = MemoryStore::new();
        let (result, skipped) = run(&mut store, "NAME,SALARY\nAlice,50000\nBob,-100\nCara,75000");

        let outcome = result.unwrap();
        assert_eq!(outcome.accepted_count, 2);
        assert_eq!(outcome.skipped_count, 1);
        assert_eq!(outcome.lines_read, 4);
        assert_eq!(skipped, vec![3]);
        assert_eq!(names(&store), vec!["Alice", "Cara"]);
        assert!(!store.in_transaction());
    }

    #[test]
    fn test_malformed_row_rolls_back_everything() {
        let mut store = MemoryStore::new();
        let (result, _) = run(&mut store, "NAME,SALARY\nAlice,50000\nCara,75000\nDan,lots");

        match result.unwrap_err() {
            ImportError::Row {
                line,
                content,
                fault,
            } => {
                assert_eq!(line, 4);
                assert_eq!(content, "Dan,lots");
                assert_eq!(fault, RowFault::InvalidSalary);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(store.is_empty());
        assert!(!store.in_transaction());
    }

    #[test]
    fn test_bad_header_reads_no_rows() {
        let mut store = MemoryStore::new();
        let (result, skipped) = run(&mut store, "SALARY,NAME\nBob,-1\nAlice,5");

        let err = result.unwrap_err();
        assert_eq!(err.error_kind(), "header");
        assert_eq!(err.line(), Some(1));
        assert_eq!(err.content(), Some("SALARY,NAME"));
        assert!(skipped.is_empty());
        assert!(store.is_empty());
        assert!(!store.in_transaction());
    }

    #[test]
    fn test_header_only_commits_nothing() {
        let mut store = MemoryStore::new();
        let (result, _) = run(&mut store, "NAME,SALARY\n");
        assert_eq!(result.unwrap().accepted_count, 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_blank_lines_skipped_but_counted() {
        let mut store = MemoryStore::new();
        let (result, _) = run(&mut store, "NAME,SALARY\r\n\r\nAlice,1\r\n\r\nBob,x\r\n");
        assert_eq!(result.unwrap_err().line(), Some(5));
    }

    #[test]
    fn test_reject_empty_names_option() {
        let mut store = MemoryStore::new();
        let mut reporter = CollectingReporter::new();
        let options = IngestOptions {
            empty_names: EmptyNamePolicy::Reject,
        };
        let result = IngestionPipeline::new(&mut store, &mut reporter, options)
            .ingest("NAME,SALARY\nAlice,1\n,2".as_bytes());
        assert!(matches!(
            result,
            Err(ImportError::Row {
                line: 3,
                fault: RowFault::EmptyName,
                ..
            })
        ));
        assert!(store.is_empty());
    }

    /// Store whose save fails after a fixed number of successes, and whose
    /// commit can be made to fail the way a full disk would
    struct FailingStore {
        inner: MemoryStore,
        saves_left: usize,
        fail_commit: bool,
        rollbacks: usize,
    }

    impl FailingStore {
        fn new(saves_left: usize, fail_commit: bool) -> Self {
            Self {
                inner: MemoryStore::new(),
                saves_left,
                fail_commit,
                rollbacks: 0,
            }
        }
    }

    impl RecordStore for FailingStore {
        fn begin(&mut self) -> StorageResult<()> {
            self.inner.begin()
        }
        fn save(&mut self, record: NewRecord) -> StorageResult<RecordId> {
            if self.saves_left == 0 {
                return Err(StorageError::write_failed(
                    "store offline",
                    std::io::Error::other("offline"),
                ));
            }
            self.saves_left -= 1;
            self.inner.save(record)
        }
        fn commit(&mut self) -> StorageResult<()> {
            if self.fail_commit {
                // A failed commit still closes the transaction.
                self.inner.rollback()?;
                return Err(StorageError::write_failed(
                    "disk full",
                    std::io::Error::other("no space"),
                ));
            }
            self.inner.commit()
        }
        fn rollback(&mut self) -> StorageResult<()> {
            self.rollbacks += 1;
            self.inner.rollback()
        }
        fn in_transaction(&self) -> bool {
            self.inner.in_transaction()
        }
        fn scan(&self) -> StorageResult<Vec<Record>> {
            self.inner.scan()
        }
    }

    #[test]
    fn test_storage_error_propagates_after_rollback() {
        let mut store = FailingStore::new(1, false);
        let mut reporter = CollectingReporter::new();
        let result = IngestionPipeline::new(&mut store, &mut reporter, IngestOptions::default())
            .ingest("NAME,SALARY\nAlice,1\nCara,2".as_bytes());

        let err = result.unwrap_err();
        assert_eq!(err.code(), "SALARY_STORAGE_WRITE_FAILED");
        assert_eq!(store.rollbacks, 1);
        assert!(store.inner.is_empty());
    }

    #[test]
    fn test_commit_failure_returned_without_rollback() {
        let mut store = FailingStore::new(usize::MAX, true);
        let mut reporter = CollectingReporter::new();
        let result = IngestionPipeline::new(&mut store, &mut reporter, IngestOptions::default())
            .ingest("NAME,SALARY\nAlice,1\nBob,-2\nCara,3".as_bytes());

        let err = result.unwrap_err();
        assert_eq!(err.error_kind(), "storage");
        assert_eq!(err.code(), "SALARY_STORAGE_WRITE_FAILED");
        assert_eq!(err.line(), None);
        assert_eq!(store.rollbacks, 0);
        assert!(!store.in_transaction());
        assert!(store.inner.is_empty());
        assert_eq!(reporter.lines(), vec![3]);
    }

    #[test]
    fn test_open_transaction_is_not_hijacked() {
        let mut store = MemoryStore::new();
        store.begin().unwrap();
        let (result, _) = run(&mut store, "NAME,SALARY\nAlice,1");
        assert_eq!(result.unwrap_err().code(), "SALARY_TRANSACTION_STATE");
        assert!(store.in_transaction());
    }
}
