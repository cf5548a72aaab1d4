//! In-memory doubles for the transport and encoder ports.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use stitch_domain::constants::JSON_CONTENT_TYPE;
use stitch_domain::{Credentials, Result, StitchError};

use crate::client::ApiClient;
use crate::ports::{RequestEncoder, Transport, TransportRequest, TransportResponse};
use crate::sequence::MockClock;

pub const TEST_CLIENT_ID: u64 = 4242;
pub const TEST_TOKEN: &str = "test-token";
pub const TEST_BASE_URL: &str = "https://stitch.test/v2/";

/// Plain JSON encoder.
pub struct JsonTestEncoder;

impl RequestEncoder for JsonTestEncoder {
    fn content_type(&self) -> &'static str {
        JSON_CONTENT_TYPE
    }

    fn encode(&self, commands: &[Value]) -> Result<Vec<u8>> {
        serde_json::to_vec(commands).map_err(|e| StitchError::Encode(e.to_string()))
    }
}

/// Records every request and replays scripted responses in order.
///
/// Once the script is exhausted every call answers `200 {"status":"ok"}`.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<TransportRequest>>,
    responses: Mutex<VecDeque<Result<TransportResponse>>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(TransportResponse { status, body: body.to_string() }));
    }

    pub fn fail(&self, message: &str) {
        self.responses.lock().unwrap().push_back(Err(StitchError::Transport(message.to_string())));
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Decoded JSON bodies of every request that carried one.
    pub fn sent_batches(&self) -> Vec<Vec<Value>> {
        self.requests()
            .into_iter()
            .filter_map(|request| request.body)
            .map(|body| serde_json::from_slice(&body).unwrap())
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn post(&self, request: &TransportRequest) -> Result<TransportResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(TransportResponse { status: 200, body: r#"{"status":"ok"}"#.to_string() })
        })
    }
}

/// Client wired to a recording transport and a mock clock at `millis`.
pub fn test_client(transport: Arc<RecordingTransport>, millis: i64) -> (ApiClient, MockClock) {
    let clock = MockClock::new(millis);
    let client = ApiClient::builder()
        .credentials(Credentials::new(TEST_CLIENT_ID, TEST_TOKEN))
        .transport(transport)
        .encoder(Arc::new(JsonTestEncoder))
        .base_url(TEST_BASE_URL)
        .clock(Arc::new(clock.clone()))
        .build()
        .unwrap();
    (client, clock)
}
