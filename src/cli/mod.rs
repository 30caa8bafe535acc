//! CLI module for salarydb
//!
//! Provides command-line interface for:
//! - init: Create the data directory and empty store
//! - import: Ingest one CSV file atomically
//! - query: One-shot range query

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, QueryArgs};
pub use commands::{execute, import, init, query, run, run_command};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{error_value, response_value, write_error, write_response};
