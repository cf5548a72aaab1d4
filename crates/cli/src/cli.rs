//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use stitch_domain::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "stitch-import", version, about = "Push records to the Stitch Import API")]
pub struct Cli {
    /// Config file (TOML or JSON), probed when omitted; `STITCH_*` variables override it
    #[arg(long, global = true, env = "STITCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the configured log format (`text` or `json`)
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check credentials by sending a sample command to `import/validate`
    Validate,
    /// Upsert newline-delimited JSON records into a table
    Push(PushArgs),
}

#[derive(Debug, Clone, Args)]
pub struct PushArgs {
    /// Destination table
    #[arg(long, short = 't')]
    pub table: String,

    /// Primary key field; repeat or comma-separate for composite keys
    #[arg(long = "key", short = 'k', required = true, value_delimiter = ',')]
    pub keys: Vec<String>,

    /// Records per request (`0` sends everything at once)
    #[arg(long, short = 'b')]
    pub batch_size: Option<usize>,

    /// JSON Lines input file; stdin when omitted
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,
}
