//! Error types used throughout the client

use thiserror::Error;

use crate::constants::PAYLOAD_EXCERPT_LIMIT;

/// Main error type for the Stitch client
#[derive(Error, Debug)]
pub enum StitchError {
    /// Payload or arguments rejected before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The service answered with a status outside the accepted set.
    #[error(
        "Stitch API {sub_path} returned HTTP {status}: {body}\n----\n{}",
        payload_excerpt(.payload)
    )]
    Api {
        /// Sub-path of the failed call (e.g. `import/push`).
        sub_path: String,
        /// HTTP status code returned by the service.
        status: u16,
        /// Raw response body.
        body: String,
        /// Encoded request body that was sent (empty if none).
        payload: String,
    },

    /// Connection, timeout or other network failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request body could not be encoded.
    #[error("Encoding error: {0}")]
    Encode(String),

    /// A success response carried a body that is not JSON.
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A batch inside a multi-batch push failed; earlier batches stay committed.
    #[error(
        "batch {batch_index} failed after {committed_records} records were committed: {source}"
    )]
    BatchFailed {
        /// Zero-based index of the batch that failed.
        batch_index: usize,
        /// Records delivered by earlier batches.
        committed_records: usize,
        /// Underlying failure.
        #[source]
        source: Box<StitchError>,
    },
}

impl StitchError {
    /// HTTP status carried by this error, looking through batch wrappers.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::BatchFailed { source, .. } => source.status(),
            _ => None,
        }
    }

    /// `true` for 4xx responses, which will not succeed if resubmitted as-is.
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|status| (400..500).contains(&status))
    }

    /// Records committed before the failure, when known.
    pub fn committed_records(&self) -> Option<usize> {
        match self {
            Self::BatchFailed { committed_records, .. } => Some(*committed_records),
            _ => None,
        }
    }

    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Api { .. } => "api",
            Self::Transport(_) => "transport",
            Self::Encode(_) => "encode",
            Self::Decode(_) => "decode",
            Self::Config(_) => "config",
            Self::BatchFailed { .. } => "batch_failed",
        }
    }
}

/// Truncate a payload for display without splitting a UTF-8 character.
fn payload_excerpt(payload: &str) -> String {
    if payload.len() <= PAYLOAD_EXCERPT_LIMIT {
        return payload.to_string();
    }

    let mut end = PAYLOAD_EXCERPT_LIMIT;
    while !payload.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... ({} bytes total)", &payload[..end], payload.len())
}

/// Result type alias for Stitch operations
pub type Result<T> = std::result::Result<T, StitchError>;
