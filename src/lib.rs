//! salarydb - salary record ingestion and range queries
//!
//! - `ingest`: atomic import of `NAME,SALARY` files
//! - `query`: filtered, sorted, paginated salary-range queries
//! - `storage`: record stores (in-memory and checksummed file)

pub mod cli;
pub mod ingest;
pub mod observability;
pub mod query;
pub mod storage;
