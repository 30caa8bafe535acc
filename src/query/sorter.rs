//! Result ordering and pagination window
//!
//! Without a sort key results come back in record id order, so the
//! default ordering is deterministic too.

use super::params::QueryParams;
use super::sort::SortSpec;
use crate::storage::Record;

/// Orders and windows result records
pub struct RecordSorter;

impl RecordSorter {
    /// Sorts by `sort`, or by id when no key is given.
    pub fn sort(records: &mut [Record], sort: Option<SortSpec>) {
        match sort {
            Some(spec) => records.sort_by(|a, b| spec.compare(a, b)),
            None => records.sort_by_key(|r| r.id),
        }
    }

    /// Applies `offset` then `limit` to already ordered records.
    ///
    /// An offset past the end yields an empty result.
    pub fn window(records: Vec<Record>, offset: usize, limit: Option<usize>) -> Vec<Record> {
        let page = records.into_iter().skip(offset);
        match limit {
            Some(limit) => page.take(limit).collect(),
            None => page.collect(),
        }
    }

    /// Filter is assumed done; sorts then windows per `params`.
    pub fn order_and_window(mut records: Vec<Record>, params: &QueryParams) -> Vec<Record> {
        Self::sort(&mut records, params.sort_type());
        Self::window(records, params.offset(), params.limit())
    }
}
