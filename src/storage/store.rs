//! The persistence contract shared by ingestion and queries

use super::errors::{StorageError, StorageResult};
use super::record::{NewRecord, Record, RecordId};
use crate::query::QueryParams;

/// A record collection with an explicit transaction boundary.
///
/// Writes happen only inside a transaction: `save` stages a record and
/// returns the id it will carry, `commit` makes all staged records visible
/// at once, `rollback` discards them. Reads only ever see committed records.
pub trait RecordStore {
    /// Opens a transaction. Fails if one is already open.
    fn begin(&mut self) -> StorageResult<()>;

    /// Stages a record in the open transaction and returns its id.
    fn save(&mut self, record: NewRecord) -> StorageResult<RecordId>;

    /// Publishes all staged records and closes the transaction.
    ///
    /// The transaction is closed whether or not the commit succeeds.
    fn commit(&mut self) -> StorageResult<()>;

    /// Discards all staged records and closes the transaction.
    fn rollback(&mut self) -> StorageResult<()>;

    fn in_transaction(&self) -> bool;

    /// Whether `find_by_salary_range` is implemented.
    fn supports_range_query(&self) -> bool {
        false
    }

    /// Filters, orders and windows committed records per `params`.
    fn find_by_salary_range(&self, _params: &QueryParams) -> StorageResult<Vec<Record>> {
        Err(StorageError::unsupported("find_by_salary_range"))
    }

    /// All committed records in id order.
    fn scan(&self) -> StorageResult<Vec<Record>>;
}

/// Records staged by an open transaction.
#[derive(Debug)]
pub(crate) struct StagedWrites {
    next_id: RecordId,
    records: Vec<Record>,
}

impl StagedWrites {
    pub(crate) fn new(next_id: RecordId) -> Self {
        Self {
            next_id,
            records: Vec::new(),
        }
    }

    pub(crate) fn stage(&mut self, record: NewRecord) -> RecordId {
        let id = self.next_id;
        self.records.push(record.with_id(id));
        self.next_id = id.next();
        id
    }

    /// Id the store should hand out after this batch commits
    pub(crate) fn next_id(&self) -> RecordId {
        self.next_id
    }

    pub(crate) fn records(&self) -> &[Record] {
        &self.records
    }

    pub(crate) fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// Opens a staging area, refusing nested transactions.
pub(crate) fn begin_staging(
    staged: &mut Option<StagedWrites>,
    next_id: RecordId,
) -> StorageResult<()> {
    if staged.is_some() {
        return Err(StorageError::transaction_state(
            "begin called while a transaction is already open",
        ));
    }
    *staged = Some(StagedWrites::new(next_id));
    Ok(())
}
