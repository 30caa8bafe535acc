//! Salary query subsystem
//!
//! Composes a salary range filter, an optional pagination window and an
//! optional sort key into one read against a `RecordStore`.
//!
//! # Evaluation Order (fixed)
//!
//! 1. Filter by inclusive salary range
//! 2. Sort (by key, ties on id; id order when no key)
//! 3. Skip `offset`
//! 4. Take `limit`, if present
//!
//! Stores that evaluate queries natively must honour the same order.

mod engine;
mod errors;
mod filters;
mod params;
mod sort;
mod sorter;

pub use engine::{QueryEngine, QueryMode};
pub use errors::{QueryError, QueryResult};
pub use filters::SalaryRangeFilter;
pub use params::{QueryParams, RawQueryParams};
pub use sort::SortSpec;
pub use sorter::RecordSorter;

pub(crate) use sort::compare_salary;
