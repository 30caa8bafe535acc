//! CLI command implementations
//!
//! Each command loads the config, applies its log level, opens the file
//! store and performs one operation. Output goes through `io`.

use std::path::Path;

use serde_json::{json, Value};

use crate::ingest::{ImportReport, IngestionPipeline, LogReporter, SilentReporter, SkipReporter};
use crate::observability::Logger;
use crate::query::{QueryEngine, RawQueryParams};
use crate::storage::{FileStore, Record};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments, runs the command and prints the error response if it
/// fails. This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command).map_err(|err| {
        // Nothing else can be reported if stdout itself is gone.
        let _ = write_error(&err);
        err
    })
}

/// Run one command and print its response
pub fn run_command(cmd: Command) -> CliResult<()> {
    let data = execute(cmd)?;
    write_response(data)
}

/// Run one command and return its response data without printing
pub fn execute(cmd: Command) -> CliResult<Value> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Import { file, config } => match import(&config, &file)? {
            ImportReport::Committed(outcome) => Ok(json!(outcome)),
            ImportReport::Failed(failure) => Err(failure.into()),
        },
        Command::Query { config, params } => {
            let records = query(&config, params.into())?;
            Ok(json!({
                "count": records.len(),
                "records": records,
            }))
        }
    }
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.log_severity()?);
    Ok(config)
}

fn open_store(config: &Config) -> CliResult<FileStore> {
    let data_dir = config.data_path();
    if !FileStore::exists(data_dir) {
        return Err(CliError::not_initialized());
    }
    Ok(FileStore::open(data_dir)?)
}

/// Initialize a new data directory with an empty store
pub fn init(config_path: &Path) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let data_dir = config.data_path();

    if FileStore::exists(data_dir) {
        return Err(CliError::already_initialized());
    }

    let store = FileStore::open(data_dir)?;

    Ok(json!({
        "initialized": true,
        "path": store.path().display().to_string(),
    }))
}

/// Import one file into the store
///
/// The `Err` side covers config and store setup only; a rejected file comes
/// back as `ImportReport::Failed`.
pub fn import(config_path: &Path, file: &Path) -> CliResult<ImportReport> {
    let config = load_config(config_path)?;
    let mut store = open_store(&config)?;

    let mut reporter: Box<dyn SkipReporter> = if config.report_skipped_rows {
        Box::new(LogReporter)
    } else {
        Box::new(SilentReporter)
    };

    let result = IngestionPipeline::new(&mut store, reporter.as_mut(), config.ingest_options())
        .ingest_path(file);

    Ok(ImportReport::from(&result))
}

/// Run one range query against the store
pub fn query(config_path: &Path, params: RawQueryParams) -> CliResult<Vec<Record>> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;

    Ok(QueryEngine::new(&store).query_raw(params)?)
}
