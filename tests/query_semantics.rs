//! Query Semantics Tests
//!
//! Covers:
//! - inclusive salary range filtering
//! - sort then offset then limit, in that order
//! - parameter errors are raised before the store is touched
//! - native and scan-based evaluation return identical results

use std::cell::Cell;

use salarydb::query::{QueryEngine, QueryError, QueryMode, QueryParams, RawQueryParams, SortSpec};
use salarydb::storage::{
    FileStore, MemoryStore, NewRecord, Record, RecordId, RecordStore, StorageResult,
};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn load(store: &mut dyn RecordStore, rows: &[(&str, f64)]) {
    store.begin().unwrap();
    for (name, salary) in rows {
        store.save(NewRecord::new(*name, *salary)).unwrap();
    }
    store.commit().unwrap();
}

fn staff() -> MemoryStore {
    let mut store = MemoryStore::new();
    load(
        &mut store,
        &[
            ("Cara", 75000.0),
            ("Alice", 50000.0),
            ("Eve", 40000.0),
            ("Bob", 90000.0),
            ("Dan", 80000.0),
            ("Abe", 50000.0),
        ],
    );
    store
}

fn names(records: &[Record]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

fn range(min: f64, max: f64) -> QueryParams {
    QueryParams::new(min, max).unwrap()
}

/// Scan-only store that counts every access
struct CountingStore {
    inner: MemoryStore,
    scans: Cell<usize>,
}

impl RecordStore for CountingStore {
    fn begin(&mut self) -> StorageResult<()> {
        self.inner.begin()
    }
    fn save(&mut self, record: NewRecord) -> StorageResult<RecordId> {
        self.inner.save(record)
    }
    fn commit(&mut self) -> StorageResult<()> {
        self.inner.commit()
    }
    fn rollback(&mut self) -> StorageResult<()> {
        self.inner.rollback()
    }
    fn in_transaction(&self) -> bool {
        self.inner.in_transaction()
    }
    fn scan(&self) -> StorageResult<Vec<Record>> {
        self.scans.set(self.scans.get() + 1);
        self.inner.scan()
    }
}

// =============================================================================
// Filtering and windowing
// =============================================================================

#[test]
fn test_bounds_are_inclusive() {
    let store = staff();
    let result = QueryEngine::new(&store)
        .query(&range(50000.0, 80000.0))
        .unwrap();
    assert_eq!(names(&result), vec!["Cara", "Alice", "Dan", "Abe"]);
}

#[test]
fn test_limit_one_sorted_by_salary() {
    let mut store = MemoryStore::new();
    load(&mut store, &[("Alice", 50000.0), ("Cara", 75000.0)]);

    let params = range(40000.0, 80000.0)
        .with_offset(0)
        .with_limit(1)
        .unwrap()
        .with_sort(SortSpec::Salary);
    let result = QueryEngine::new(&store).query(&params).unwrap();
    assert_eq!(names(&result), vec!["Alice"]);
}

#[test]
fn test_salary_ties_broken_by_id() {
    let store = staff();
    let params = range(0.0, 100000.0).with_sort(SortSpec::Salary);
    let result = QueryEngine::new(&store).query(&params).unwrap();
    assert_eq!(
        names(&result),
        vec!["Eve", "Alice", "Abe", "Cara", "Dan", "Bob"]
    );
}

#[test]
fn test_offset_applies_after_sort() {
    let store = staff();
    let params = range(0.0, 100000.0)
        .with_sort(SortSpec::Name)
        .with_offset(2)
        .with_limit(2)
        .unwrap();
    let result = QueryEngine::new(&store).query(&params).unwrap();
    assert_eq!(names(&result), vec!["Bob", "Cara"]);
}

#[test]
fn test_offset_past_end_is_empty() {
    let store = staff();
    for offset in [6, 7, 1000] {
        let params = range(0.0, 100000.0).with_offset(offset);
        assert!(QueryEngine::new(&store).query(&params).unwrap().is_empty());
    }
}

#[test]
fn test_sorts_are_permutations() {
    let store = staff();
    let engine = QueryEngine::new(&store);

    let mut by_salary = engine
        .query(&range(0.0, 100000.0).with_sort(SortSpec::Salary))
        .unwrap();
    let mut by_name = engine
        .query(&range(0.0, 100000.0).with_sort(SortSpec::Name))
        .unwrap();
    assert_ne!(by_salary, by_name);

    by_salary.sort_by_key(|r| r.id);
    by_name.sort_by_key(|r| r.id);
    assert_eq!(by_salary, by_name);
}

// =============================================================================
// Parameter errors
// =============================================================================

#[test]
fn test_inverted_range_rejected_before_store() {
    let store = CountingStore {
        inner: staff(),
        scans: Cell::new(0),
    };
    let engine = QueryEngine::new(&store);

    let raw = RawQueryParams {
        min_salary: 80000.0,
        max_salary: 40000.0,
        ..Default::default()
    };
    let err = engine.query_raw(raw).unwrap_err();

    assert!(matches!(err, QueryError::InvalidRange { .. }));
    assert_eq!(err.status_code(), 400);
    assert_eq!(store.scans.get(), 0);
}

#[test]
fn test_raw_params_errors() {
    let base = RawQueryParams {
        min_salary: 0.0,
        max_salary: 10.0,
        ..Default::default()
    };

    let cases = [
        (
            RawQueryParams {
                offset: Some(-1),
                ..base.clone()
            },
            "SALARY_QUERY_INVALID_OFFSET",
        ),
        (
            RawQueryParams {
                limit: Some(0),
                ..base.clone()
            },
            "SALARY_QUERY_INVALID_LIMIT",
        ),
        (
            RawQueryParams {
                sort_type: Some("AGE".into()),
                ..base.clone()
            },
            "SALARY_QUERY_UNKNOWN_SORT",
        ),
        (
            RawQueryParams {
                min_salary: f64::NAN,
                ..base.clone()
            },
            "SALARY_QUERY_INVALID_BOUND",
        ),
    ];

    for (raw, code) in cases {
        let err = QueryParams::try_from(raw).unwrap_err();
        assert_eq!(err.code(), code);
    }
}

#[test]
fn test_raw_params_from_json() {
    let raw: RawQueryParams = serde_json::from_str(
        r#"{"minSalary": 45000, "maxSalary": 80000, "limit": 1, "sortType": " salary "}"#,
    )
    .unwrap();

    let store = staff();
    let result = QueryEngine::new(&store).query_raw(raw).unwrap();
    assert_eq!(names(&result), vec!["Alice"]);
}

// =============================================================================
// Native vs in-memory evaluation
// =============================================================================

#[test]
fn test_native_and_scan_agree() {
    let memory = staff();
    let counting = CountingStore {
        inner: staff(),
        scans: Cell::new(0),
    };

    let native = QueryEngine::new(&memory);
    let scanned = QueryEngine::new(&counting);
    assert_eq!(native.mode(), QueryMode::Native);
    assert_eq!(scanned.mode(), QueryMode::InMemory);

    for sort in [None, Some(SortSpec::Name), Some(SortSpec::Salary)] {
        for (offset, limit) in [(0, None), (1, Some(2)), (3, Some(10)), (9, None)] {
            let mut params = range(45000.0, 85000.0).with_offset(offset);
            if let Some(limit) = limit {
                params = params.with_limit(limit).unwrap();
            }
            if let Some(sort) = sort {
                params = params.with_sort(sort);
            }
            assert_eq!(
                native.query(&params).unwrap(),
                scanned.query(&params).unwrap(),
                "params {:?}",
                params
            );
        }
    }
}

#[test]
fn test_file_store_queries_by_scan() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = FileStore::open(temp_dir.path()).unwrap();
    load(&mut store, &[("Alice", 50000.0), ("Bob", 10.0), ("Cara", 75000.0)]);

    let engine = QueryEngine::new(&store);
    assert_eq!(engine.mode(), QueryMode::InMemory);

    let params = range(40000.0, 80000.0).with_sort(SortSpec::Name);
    assert_eq!(names(&engine.query(&params).unwrap()), vec!["Alice", "Cara"]);
}
