//! Subcommand implementations

pub mod push;
pub mod validate;

use std::io::Write;

use anyhow::Context;
use serde_json::Value;

/// Write an API result to stdout as pretty JSON.
fn print_result(result: &Value) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(result).context("failed to render result")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}").context("failed to write result")?;
    Ok(())
}
