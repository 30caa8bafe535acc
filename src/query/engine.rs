//! Query engine for salary records
//!
//! Execution flow:
//! 1. Parameters are already validated (`QueryParams` cannot hold an
//!    inverted range or an unknown sort key)
//! 2. If the store evaluates range queries natively, delegate entirely
//! 3. Otherwise scan the store and evaluate in memory, in fixed order:
//!    filter, sort, offset, limit
//!
//! Both paths produce the same records in the same order.

use super::errors::QueryResult;
use super::filters::SalaryRangeFilter;
use super::params::{QueryParams, RawQueryParams};
use super::sorter::RecordSorter;
use crate::observability::Logger;
use crate::storage::{Record, RecordStore};

/// How a query was evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// The store filtered, ordered and windowed the records itself
    Native,
    /// The engine did it over a full scan
    InMemory,
}

impl QueryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMode::Native => "native",
            QueryMode::InMemory => "in_memory",
        }
    }
}

/// Runs salary range queries against a store.
pub struct QueryEngine<'a, S: RecordStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> QueryEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The evaluation path this engine will take for its store
    pub fn mode(&self) -> QueryMode {
        if self.store.supports_range_query() {
            QueryMode::Native
        } else {
            QueryMode::InMemory
        }
    }

    /// Returns the records matching `params`, ordered and windowed.
    pub fn query(&self, params: &QueryParams) -> QueryResult<Vec<Record>> {
        let mode = self.mode();
        let records = match mode {
            QueryMode::Native => self.store.find_by_salary_range(params)?,
            QueryMode::InMemory => Self::evaluate(self.store.scan()?, params),
        };

        let min = params.min_salary().to_string();
        let max = params.max_salary().to_string();
        let offset = params.offset().to_string();
        let limit = params
            .limit()
            .map(|l| l.to_string())
            .unwrap_or_else(|| "none".to_string());
        let sort = params.sort_type().map(|s| s.token()).unwrap_or("none");
        let returned = records.len().to_string();
        Logger::info(
            "QUERY_EXECUTED",
            &[
                ("min_salary", &min),
                ("max_salary", &max),
                ("offset", &offset),
                ("limit", &limit),
                ("sort_type", sort),
                ("mode", mode.as_str()),
                ("returned", &returned),
            ],
        );

        Ok(records)
    }

    /// Validates caller-supplied parameters, then queries.
    ///
    /// Invalid parameters are rejected before the store is touched.
    pub fn query_raw(&self, raw: RawQueryParams) -> QueryResult<Vec<Record>> {
        let params = QueryParams::try_from(raw)?;
        self.query(&params)
    }

    /// In-memory evaluation: filter, sort, offset, limit.
    pub fn evaluate(records: Vec<Record>, params: &QueryParams) -> Vec<Record> {
        let matching = SalaryRangeFilter::apply(records, params);
        RecordSorter::order_and_window(matching, params)
    }
}
