//! In-memory record store with native range queries
//!
//! Committed records live in an id-ordered map plus a `(salary, id)` index,
//! so a salary range is a single ordered index walk and SALARY-sorted
//! results need no extra sort.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use super::errors::{StorageError, StorageResult};
use super::record::{NewRecord, Record, RecordId};
use super::store::{begin_staging, RecordStore, StagedWrites};
use crate::query::{compare_salary, QueryParams, RecordSorter, SortSpec};

/// Index key ordered by salary, then id
#[derive(Debug, Clone, Copy)]
struct SalaryKey {
    salary: f64,
    id: RecordId,
}

impl PartialEq for SalaryKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SalaryKey {}

impl PartialOrd for SalaryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SalaryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_salary(self.salary, other.salary).then_with(|| self.id.cmp(&other.id))
    }
}

/// Transactional in-memory store.
#[derive(Debug)]
pub struct MemoryStore {
    records: BTreeMap<RecordId, Record>,
    salary_index: BTreeSet<SalaryKey>,
    next_id: RecordId,
    staged: Option<StagedWrites>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            salary_index: BTreeSet::new(),
            next_id: RecordId::new(1),
            staged: None,
        }
    }

    /// Number of committed records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(&id)
    }

    fn publish(&mut self, record: Record) {
        self.salary_index.insert(SalaryKey {
            salary: record.salary,
            id: record.id,
        });
        self.records.insert(record.id, record);
    }
}

impl RecordStore for MemoryStore {
    fn begin(&mut self) -> StorageResult<()> {
        begin_staging(&mut self.staged, self.next_id)
    }

    fn save(&mut self, record: NewRecord) -> StorageResult<RecordId> {
        let staged = self
            .staged
            .as_mut()
            .ok_or_else(|| StorageError::no_transaction("save"))?;
        Ok(staged.stage(record))
    }

    fn commit(&mut self) -> StorageResult<()> {
        let staged = self
            .staged
            .take()
            .ok_or_else(|| StorageError::no_transaction("commit"))?;
        self.next_id = staged.next_id();
        for record in staged.into_records() {
            self.publish(record);
        }
        Ok(())
    }

    fn rollback(&mut self) -> StorageResult<()> {
        self.staged
            .take()
            .map(|_| ())
            .ok_or_else(|| StorageError::no_transaction("rollback"))
    }

    fn in_transaction(&self) -> bool {
        self.staged.is_some()
    }

    fn supports_range_query(&self) -> bool {
        true
    }

    fn find_by_salary_range(&self, params: &QueryParams) -> StorageResult<Vec<Record>> {
        let low = SalaryKey {
            salary: params.min_salary(),
            id: RecordId::new(0),
        };
        let high = SalaryKey {
            salary: params.max_salary(),
            id: RecordId::new(u64::MAX),
        };

        let mut matching: Vec<Record> = self
            .salary_index
            .range(low..=high)
            .filter_map(|key| self.records.get(&key.id).cloned())
            .collect();

        // Index order already is SALARY order
        if params.sort_type() != Some(SortSpec::Salary) {
            RecordSorter::sort(&mut matching, params.sort_type());
        }

        Ok(RecordSorter::window(
            matching,
            params.offset(),
            params.limit(),
        ))
    }

    fn scan(&self) -> StorageResult<Vec<Record>> {
        Ok(self.records.values().cloned().collect())
    }
}
