//! Configuration loader
//!
//! Loads client configuration from files and environment variables.
//!
//! ## Loading Strategy
//! 1. Reads a config file when one is given or found by probing
//! 2. Starts from defaults when there is no file
//! 3. Applies `STITCH_*` environment variables on top; a set variable
//!    always wins over the file
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `STITCH_CLIENT_ID`: Integration client id
//! - `STITCH_ACCESS_TOKEN`: Bearer token
//! - `STITCH_BASE_URL`: API base URL
//! - `STITCH_TIMEOUT_SECS`: Request timeout in seconds
//! - `STITCH_CONNECT_TIMEOUT_SECS`: Connect timeout in seconds
//! - `STITCH_BATCH_SIZE`: Records per request (`0` = unbatched)
//! - `STITCH_WIRE_FORMAT`: `transit_json` or `json`
//! - `STITCH_LOG_FORMAT`: `text` or `json`
//!
//! Credentials are required from one of the two sources.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./stitch.toml` or `./stitch.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use stitch_domain::{
    ApiConfig, Credentials, LoggingConfig, PushConfig, Result, StitchConfig, StitchError,
};
use url::Url;

use crate::errors::InfraError;

/// Integration client id.
pub const ENV_CLIENT_ID: &str = "STITCH_CLIENT_ID";
/// Bearer token.
pub const ENV_ACCESS_TOKEN: &str = "STITCH_ACCESS_TOKEN";
/// API base URL.
pub const ENV_BASE_URL: &str = "STITCH_BASE_URL";
/// Request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "STITCH_TIMEOUT_SECS";
/// Connect timeout in seconds.
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "STITCH_CONNECT_TIMEOUT_SECS";
/// Records per request.
pub const ENV_BATCH_SIZE: &str = "STITCH_BATCH_SIZE";
/// `transit_json` or `json`.
pub const ENV_WIRE_FORMAT: &str = "STITCH_WIRE_FORMAT";
/// `text` or `json`.
pub const ENV_LOG_FORMAT: &str = "STITCH_LOG_FORMAT";

const CONFIG_FILE_NAMES: [&str; 4] = ["stitch.toml", "stitch.json", "config.toml", "config.json"];

/// File contents before environment overrides; credentials may come from
/// the environment instead.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    credentials: Option<Credentials>,
    #[serde(default)]
    api: ApiConfig,
    #[serde(default)]
    push: PushConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

/// Load configuration from the first probed file (if any) with environment
/// overrides applied
///
/// # Errors
/// Returns `StitchError::Config` if:
/// - A probed file cannot be read or parsed
/// - An environment variable has an invalid value
/// - Credentials are in neither source
/// - The merged configuration fails [`validate`]
pub fn load() -> Result<StitchConfig> {
    load_layered(probe_config_paths())
}

/// Load `path` (if given) and apply environment overrides on top
///
/// Unlike [`load`], an explicit path must exist.
///
/// # Errors
/// Same as [`load`], plus a missing file at `path`.
pub fn load_layered(path: Option<PathBuf>) -> Result<StitchConfig> {
    let file = match &path {
        Some(path) => read_file_config(path)?,
        None => {
            tracing::debug!("No config file, using defaults and environment");
            FileConfig::default()
        }
    };

    let config = apply_env(file)?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from environment variables only
///
/// `STITCH_CLIENT_ID` and `STITCH_ACCESS_TOKEN` must be present; every other
/// variable falls back to its default.
///
/// # Errors
/// Returns `StitchError::Config` if required variables are missing
/// or any variable has an invalid value.
pub fn load_from_env() -> Result<StitchConfig> {
    let config = apply_env(FileConfig::default())?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file only, ignoring the environment
///
/// If `path` is `None`, probes the standard locations. Format is detected
/// by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `StitchError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing or invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<StitchConfig> {
    let config_path = match path {
        Some(p) => p,
        None => probe_config_paths().ok_or_else(|| {
            StitchError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    let file = read_file_config(&config_path)?;
    let credentials = file.credentials.ok_or_else(|| {
        StitchError::Config(format!(
            "Missing [credentials] section in {}",
            config_path.display()
        ))
    })?;

    let config =
        StitchConfig { credentials, api: file.api, push: file.push, logging: file.logging };
    validate(&config)?;
    Ok(config)
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Err(StitchError::Config(format!("Config file not found: {}", path.display())));
    }

    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| StitchError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, path)
}

fn parse_config(contents: &str, path: &Path) -> Result<FileConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| StitchError::from(InfraError::from(e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| StitchError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(StitchError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Overlay set `STITCH_*` variables on the file values.
///
/// Parse errors are returned as-is; nothing falls back silently.
fn apply_env(file: FileConfig) -> Result<StitchConfig> {
    let client_id =
        env_opt(ENV_CLIENT_ID).map(|v| parse_env::<u64>(&v, ENV_CLIENT_ID)).transpose()?;
    let access_token = env_opt(ENV_ACCESS_TOKEN);

    let credentials = match (file.credentials, client_id, access_token) {
        (_, Some(client_id), Some(access_token)) => Credentials::new(client_id, access_token),
        (Some(base), client_id, access_token) => Credentials::new(
            client_id.unwrap_or(base.client_id()),
            access_token.unwrap_or_else(|| base.access_token().to_string()),
        ),
        (None, None, _) => return Err(missing_env(ENV_CLIENT_ID)),
        (None, Some(_), None) => return Err(missing_env(ENV_ACCESS_TOKEN)),
    };

    let mut config =
        StitchConfig { credentials, api: file.api, push: file.push, logging: file.logging };

    if let Some(base_url) = env_opt(ENV_BASE_URL) {
        config.api.base_url = base_url;
    }
    if let Some(value) = env_opt(ENV_TIMEOUT_SECS) {
        config.api.timeout_secs = parse_env(&value, ENV_TIMEOUT_SECS)?;
    }
    if let Some(value) = env_opt(ENV_CONNECT_TIMEOUT_SECS) {
        config.api.connect_timeout_secs = parse_env(&value, ENV_CONNECT_TIMEOUT_SECS)?;
    }
    if let Some(value) = env_opt(ENV_WIRE_FORMAT) {
        config.api.wire_format = parse_env(&value, ENV_WIRE_FORMAT)?;
    }
    if let Some(value) = env_opt(ENV_BATCH_SIZE) {
        config.push.batch_size = parse_env(&value, ENV_BATCH_SIZE)?;
    }
    if let Some(value) = env_opt(ENV_LOG_FORMAT) {
        config.logging.format = parse_env(&value, ENV_LOG_FORMAT)?;
    }

    Ok(config)
}

/// Check values serde cannot reject on its own.
pub fn validate(config: &StitchConfig) -> Result<()> {
    if config.credentials.access_token().trim().is_empty() {
        return Err(StitchError::Config("Access token must not be empty".to_string()));
    }

    let base_url = config.api.base_url.trim();
    if base_url.is_empty() {
        return Err(StitchError::Config("Base URL must not be empty".to_string()));
    }
    let parsed = Url::parse(base_url)
        .map_err(|e| StitchError::Config(format!("Invalid base URL {base_url}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(StitchError::Config(format!(
            "Base URL must use http or https, got {}",
            parsed.scheme()
        )));
    }

    if config.api.timeout_secs == 0 {
        return Err(StitchError::Config("Timeout must be at least one second".to_string()));
    }

    Ok(())
}

/// Probe the standard locations for a configuration file
///
/// Searches the current working directory, then the directory containing
/// the executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Error for credentials found in neither the file nor the environment.
fn missing_env(key: &str) -> StitchError {
    StitchError::Config(format!(
        "Missing required environment variable: {key} (no [credentials] in a config file either)"
    ))
}

/// Optional environment variable; blank values count as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_env<T>(value: &str, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| StitchError::Config(format!("Invalid {key}: {e}")))
}
