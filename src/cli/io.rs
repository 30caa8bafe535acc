//! JSON output for the CLI
//!
//! Every command prints exactly one JSON object on stdout:
//! - success: `{"status":"ok","data":...}`
//! - failure: `{"status":"error","code":...,"message":...}` plus any extra
//!   fields the error carries
//!
//! Logs go to stderr and never mix with this output.

use std::io::{self, Write};

use serde_json::{json, Map, Value};

use super::errors::{CliError, CliResult};

/// Builds the success envelope
pub fn response_value(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

/// Builds the error envelope
pub fn error_value(err: &CliError) -> Value {
    let mut body = Map::new();
    body.insert("status".to_string(), Value::from("error"));
    body.insert("code".to_string(), Value::from(err.code_str()));
    body.insert("message".to_string(), Value::from(err.message()));
    for (key, value) in err.fields() {
        body.insert(key.clone(), value.clone());
    }
    Value::Object(body)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_json(&response_value(data))
}

/// Write an error response to stdout
pub fn write_error(err: &CliError) -> CliResult<()> {
    write_json(&error_value(err))
}

fn write_json(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
