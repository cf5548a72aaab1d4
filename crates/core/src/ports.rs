//! Port interfaces for external collaborators
//!
//! The HTTP transport and the wire-format encoder are supplied by
//! `stitch-infra` (or by test doubles); the client only sees these traits.

use async_trait::async_trait;
use serde_json::Value;
use stitch_domain::Result;

/// A fully prepared POST request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// Absolute endpoint URL.
    pub url: String,
    /// Header name/value pairs in send order.
    pub headers: Vec<(String, String)>,
    /// `None` when there is nothing to send.
    pub body: Option<Vec<u8>>,
}

impl TransportRequest {
    /// First header value with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and raw body of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// Performs the HTTPS POST
///
/// Implementations return `StitchError::Transport` for connection-level
/// failures and never interpret the status code.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and wait for the complete response.
    async fn post(&self, request: &TransportRequest) -> Result<TransportResponse>;
}

/// Serializes an ordered list of command maps into the wire format
pub trait RequestEncoder: Send + Sync {
    /// Value for the `Content-Type` header.
    fn content_type(&self) -> &'static str;

    /// Encode the commands as one request body.
    fn encode(&self, commands: &[Value]) -> Result<Vec<u8>>;
}
