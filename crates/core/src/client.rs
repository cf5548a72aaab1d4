//! Import API client
//!
//! Runs one API call end to end: injects the client id, encodes the
//! commands, attaches the bearer token, sends the request through the
//! transport port, interprets the status and decodes the JSON result.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use stitch_domain::constants::{
    is_success_status, CLIENT_ID_FIELD, DEFAULT_BASE_URL, PUSH_PATH, VALIDATE_PATH,
};
use stitch_domain::{ApiResult, Command, Credentials, Result, StitchError};
use tracing::{debug, info, instrument, trace, warn};

use crate::ports::{RequestEncoder, Transport, TransportRequest};
use crate::sequence::{Clock, SequenceGenerator};

/// Client for the Import API
///
/// Owns its credentials and sequence generator; two clients in one process
/// never share sequencing state.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    encoder: Arc<dyn RequestEncoder>,
    credentials: Credentials,
    base_url: String,
    sequence: SequenceGenerator,
}

impl ApiClient {
    /// Create a client against the public endpoint
    ///
    /// # Arguments
    ///
    /// * `credentials` - Client id and access token
    /// * `transport` - HTTP transport implementation
    /// * `encoder` - Wire-format encoder
    pub fn new(
        credentials: Credentials,
        transport: Arc<dyn Transport>,
        encoder: Arc<dyn RequestEncoder>,
    ) -> Self {
        Self {
            transport,
            encoder,
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            sequence: SequenceGenerator::new(),
        }
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Credentials used for every call.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Base URL the operation paths are joined onto.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Next sequence number from this client's generator.
    pub fn next_sequence(&self) -> i64 {
        self.sequence.next_sequence()
    }

    /// This client's sequence generator.
    pub fn sequence_generator(&self) -> &SequenceGenerator {
        &self.sequence
    }

    /// Execute a single API call
    ///
    /// # Arguments
    ///
    /// * `sub_path` - Operation path (e.g. `import/push`)
    /// * `data` - Ordered commands; each must serialize to a JSON object
    /// * `include_client_id` - Set `client_id` on a copy of every element
    ///
    /// # Returns
    ///
    /// Decoded JSON response body (`Value::Null` for an empty body)
    ///
    /// # Errors
    ///
    /// - `Validation` if an element is not a map (nothing is sent)
    /// - `Encode` if the wire encoder fails
    /// - `Transport` for connection-level failures
    /// - `Api` for any status other than 200, 201 or 202
    /// - `Decode` if a success body is not valid JSON
    #[instrument(skip(self, data), fields(sub_path = %sub_path, records = data.len()))]
    pub async fn api_call<T>(
        &self,
        sub_path: &str,
        data: &[T],
        include_client_id: bool,
    ) -> Result<ApiResult>
    where
        T: Serialize + Sync,
    {
        let commands = self.prepare_commands(data, include_client_id)?;

        let body = if commands.is_empty() { None } else { Some(self.encoder.encode(&commands)?) };

        let request = TransportRequest {
            url: self.endpoint(sub_path),
            headers: vec![
                ("Content-Type".to_string(), self.encoder.content_type().to_string()),
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.credentials.access_token()),
                ),
            ],
            body,
        };

        debug!(
            url = %request.url,
            bytes = request.body.as_ref().map_or(0, Vec::len),
            "POST request"
        );
        if let Some(body) = &request.body {
            trace!(payload = %String::from_utf8_lossy(body), "request payload");
        }

        let response = self.transport.post(&request).await?;

        if !is_success_status(response.status) {
            warn!(status = response.status, "Stitch API returned non-success status");
            return Err(StitchError::Api {
                sub_path: sub_path.to_string(),
                status: response.status,
                body: response.body,
                payload: request
                    .body
                    .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                    .unwrap_or_default(),
            });
        }

        let result = decode_result(sub_path, &response.body)?;

        info!(status = response.status, "Stitch API call successful");
        Ok(result)
    }

    /// Send a batch of commands to `import/push` with the client id attached.
    pub async fn push(&self, commands: &[Command]) -> Result<ApiResult> {
        self.api_call(PUSH_PATH, commands, true).await
    }

    /// Check connectivity and credentials against `import/validate`
    ///
    /// Without `data`, sends a single sample upsert into the `test` table
    /// with a fresh sequence number.
    pub async fn validate(
        &self,
        data: Option<&[Value]>,
        include_client_id: bool,
    ) -> Result<ApiResult> {
        match data {
            Some(data) => self.api_call(VALIDATE_PATH, data, include_client_id).await,
            None => {
                let sample = [Command::validation_sample(self.next_sequence())];
                self.api_call(VALIDATE_PATH, &sample, include_client_id).await
            }
        }
    }

    fn endpoint(&self, sub_path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), sub_path.trim_start_matches('/'))
    }

    fn prepare_commands<T: Serialize>(
        &self,
        data: &[T],
        include_client_id: bool,
    ) -> Result<Vec<Value>> {
        data.iter()
            .enumerate()
            .map(|(index, item)| {
                let value = serde_json::to_value(item).map_err(|e| {
                    StitchError::Validation(format!("element {index} cannot be serialized: {e}"))
                })?;

                match value {
                    Value::Object(mut map) => {
                        if include_client_id {
                            map.insert(
                                CLIENT_ID_FIELD.to_string(),
                                Value::from(self.credentials.client_id()),
                            );
                        }
                        Ok(Value::Object(map))
                    }
                    other => Err(StitchError::Validation(format!(
                        "bad data: element {index} is {}, expected a map",
                        json_kind(&other)
                    ))),
                }
            })
            .collect()
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

fn decode_result(sub_path: &str, body: &str) -> Result<ApiResult> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(body).map_err(|e| {
        StitchError::Decode(format!("{sub_path} returned a body that is not JSON: {e}"))
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a map",
    }
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    credentials: Option<Credentials>,
    transport: Option<Arc<dyn Transport>>,
    encoder: Option<Arc<dyn RequestEncoder>>,
    base_url: Option<String>,
    clock: Option<Arc<dyn Clock>>,
}

impl ApiClientBuilder {
    /// Client id and access token (required).
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Transport that performs the POST (required).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Wire-format encoder (required).
    pub fn encoder(mut self, encoder: Arc<dyn RequestEncoder>) -> Self {
        self.encoder = Some(encoder);
        self
    }

    /// Override the public endpoint.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the clock feeding the sequence generator.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns `Config` if credentials, transport or encoder are missing,
    /// or the base URL is empty
    pub fn build(self) -> Result<ApiClient> {
        let credentials =
            self.credentials.ok_or_else(|| StitchError::Config("Credentials not set".into()))?;
        let transport =
            self.transport.ok_or_else(|| StitchError::Config("Transport not set".into()))?;
        let encoder = self.encoder.ok_or_else(|| StitchError::Config("Encoder not set".into()))?;

        let base_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if base_url.trim().is_empty() {
            return Err(StitchError::Config("Base URL must not be empty".into()));
        }

        let sequence = match self.clock {
            Some(clock) => SequenceGenerator::with_clock(clock),
            None => SequenceGenerator::new(),
        };

        Ok(ApiClient { transport, encoder, credentials, base_url, sequence })
    }
}
