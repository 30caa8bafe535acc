//! CLI argument definitions using clap
//!
//! Commands:
//! - salarydb init --config <path>
//! - salarydb import <FILE> --config <path>
//! - salarydb query --min-salary <n> --max-salary <n> [--offset] [--limit] [--sort] --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::query::RawQueryParams;

/// salarydb - import salary records and query them by range
#[derive(Parser, Debug)]
#[command(name = "salarydb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new data directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./salarydb.json")]
        config: PathBuf,
    },

    /// Import a NAME,SALARY file as one transaction
    Import {
        /// CSV file to import
        file: PathBuf,

        /// Path to configuration file
        #[arg(long, default_value = "./salarydb.json")]
        config: PathBuf,
    },

    /// Query records by salary range
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./salarydb.json")]
        config: PathBuf,

        #[command(flatten)]
        params: QueryArgs,
    },
}

/// Query parameters as typed on the command line
///
/// Offset and limit are taken as signed integers so a negative value is
/// reported as a query error rather than an argument error.
#[derive(clap::Args, Debug, Clone)]
pub struct QueryArgs {
    /// Inclusive lower salary bound
    #[arg(long, allow_negative_numbers = true)]
    pub min_salary: f64,

    /// Inclusive upper salary bound
    #[arg(long, allow_negative_numbers = true)]
    pub max_salary: f64,

    /// Number of matching records to skip
    #[arg(long, allow_negative_numbers = true)]
    pub offset: Option<i64>,

    /// Maximum number of records to return
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Sort key: NAME or SALARY
    #[arg(long)]
    pub sort: Option<String>,
}

impl From<QueryArgs> for RawQueryParams {
    fn from(args: QueryArgs) -> Self {
        RawQueryParams {
            min_salary: args.min_salary,
            max_salary: args.max_salary,
            offset: args.offset,
            limit: args.limit,
            sort_type: args.sort,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
