//! Configuration structures
//!
//! Deserialized from TOML/JSON files or assembled from environment variables
//! by the infrastructure loader. Every section except `credentials` has
//! defaults, so a minimal file only needs the client id and token.

use serde::Deserialize;

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS,
};
use crate::types::Credentials;

/// Top-level client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StitchConfig {
    /// Client id and access token.
    pub credentials: Credentials,
    /// `[api]` section.
    #[serde(default)]
    pub api: ApiConfig,
    /// `[push]` section.
    #[serde(default)]
    pub push: PushConfig,
    /// `[logging]` section.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StitchConfig {
    /// Configuration with defaults for everything but the credentials.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials,
            api: ApiConfig::default(),
            push: PushConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Endpoint and transport settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL; sub-paths such as `import/push` are appended to it.
    pub base_url: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Body encoding for push and validate.
    pub wire_format: WireFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            wire_format: WireFormat::default(),
        }
    }
}

/// Request body encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFormat {
    /// Transit verbose JSON (`application/transit+json`).
    #[default]
    TransitJson,
    /// Plain JSON (`application/json`).
    Json,
}

crate::impl_wire_name_conversions!(WireFormat {
    TransitJson => "transit_json",
    Json => "json",
});

/// Batching settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    /// Maximum records per request; `0` sends everything in one request.
    pub batch_size: usize,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self { batch_size: DEFAULT_BATCH_SIZE }
    }
}

/// Log output settings used by binaries
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Subscriber output format.
    pub format: LogFormat,
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

crate::impl_wire_name_conversions!(LogFormat {
    Text => "text",
    Json => "json",
});
