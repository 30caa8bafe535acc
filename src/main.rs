//! salarydb CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`, which prints the JSON
//! response. The error is repeated on stderr and the process exits non-zero.

use salarydb::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
