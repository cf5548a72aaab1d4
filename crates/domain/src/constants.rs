//! API constants
//!
//! Centralized location for endpoint paths, headers and defaults shared by
//! the core and infrastructure crates.

// Endpoint configuration
/// Public Import API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.stitchdata.com/v2/";
/// Credential and payload check, nothing is persisted.
pub const VALIDATE_PATH: &str = "import/validate";
/// Batch upload.
pub const PUSH_PATH: &str = "import/push";

// Request headers
/// Content type of transit-encoded bodies.
pub const TRANSIT_CONTENT_TYPE: &str = "application/transit+json";
/// Content type of plain JSON bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// `User-Agent` sent by the HTTP transport.
pub const USER_AGENT: &str = concat!("stitch-import/", env!("CARGO_PKG_VERSION"));

/// Statuses treated as success for both validate and push calls.
pub const SUCCESS_STATUSES: [u16; 3] = [200, 201, 202];

/// Field injected into every command when client identity is enabled.
pub const CLIENT_ID_FIELD: &str = "client_id";

// Batching
/// Records per request unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 100;

// Transport timeouts
/// Whole-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Connection establishment timeout.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

// Sample payload used by `validate` when the caller supplies none
/// Table named by the sample command.
pub const VALIDATE_SAMPLE_TABLE: &str = "test";
/// Key field of the sample command.
pub const VALIDATE_SAMPLE_KEY: &str = "id";

/// Upper bound on payload bytes echoed into an API error message.
pub const PAYLOAD_EXCERPT_LIMIT: usize = 2048;

/// Returns `true` if `status` is in [`SUCCESS_STATUSES`].
pub fn is_success_status(status: u16) -> bool {
    SUCCESS_STATUSES.contains(&status)
}
