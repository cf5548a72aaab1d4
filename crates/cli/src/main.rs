//! `stitch-import`: command-line client for the Stitch Import API

mod cli;
mod cmd;
mod input;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use stitch_infra::{config, init_tracing};
use tracing::{debug, info, warn};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be applied before clap reads env-backed arguments
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(config::probe_config_paths);
    let config =
        config::load_layered(config_path.clone()).context("failed to load configuration")?;

    // the log format is part of the configuration, so events start here
    init_tracing(cli.log_format.unwrap_or(config.logging.format))?;

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, "could not load .env file"),
    }
    info!(
        source = %config_source(config_path.as_deref()),
        base_url = %config.api.base_url,
        wire_format = %config.api.wire_format,
        batch_size = config.push.batch_size,
        "configuration loaded"
    );

    match cli.command {
        Commands::Validate => cmd::validate::run(&config).await,
        Commands::Push(args) => cmd::push::run(&config, args).await,
    }
}

fn config_source(path: Option<&Path>) -> String {
    match path {
        Some(path) => format!("{} + environment", path.display()),
        None => "environment".to_string(),
    }
}
