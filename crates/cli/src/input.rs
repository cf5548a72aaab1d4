//! JSON Lines input

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context};
use serde_json::Value;
use stitch_domain::Record;

/// Reader over `path`, or stdin when no path is given.
pub fn open(path: Option<&Path>) -> anyhow::Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open input {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(std::io::stdin().lock())),
    }
}

/// Parse one JSON object per line; blank lines are skipped.
///
/// The whole input is parsed before anything is sent, so a malformed line
/// never leaves a table partially loaded.
pub fn read_records<R: BufRead>(reader: R) -> anyhow::Result<Vec<Record>> {
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line.with_context(|| format!("failed to read line {number}"))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("line {number}: invalid JSON"))?;
        match value {
            Value::Object(record) => records.push(record),
            other => bail!("line {number}: expected a JSON object, got {}", kind(&other)),
        }
    }

    Ok(records)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
