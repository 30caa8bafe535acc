//! Salary range filtering for in-memory evaluation

use super::params::QueryParams;
use crate::storage::Record;

/// Keeps records whose salary lies in the query's inclusive range.
pub struct SalaryRangeFilter;

impl SalaryRangeFilter {
    /// Returns true if the record falls inside `[min, max]`.
    pub fn matches(record: &Record, params: &QueryParams) -> bool {
        params.contains(record.salary)
    }

    /// Drops every record outside the range, preserving input order.
    pub fn apply(records: Vec<Record>, params: &QueryParams) -> Vec<Record> {
        records
            .into_iter()
            .filter(|r| Self::matches(r, params))
            .collect()
    }
}
