//! Shared fixtures for the integration tests

use std::sync::Arc;

use serde_json::Value;
use stitch_core::{ApiClient, BatchPusher};
use stitch_domain::{Credentials, Record, StitchConfig};
use stitch_infra::{encoder_for, HttpTransportBuilder};
use wiremock::MockServer;

pub const CLIENT_ID: u64 = 4242;
pub const ACCESS_TOKEN: &str = "integration-token";

/// Configuration pointing at the mock server's `/v2/` prefix.
pub fn config_for(server: &MockServer) -> StitchConfig {
    let mut config = StitchConfig::with_credentials(Credentials::new(CLIENT_ID, ACCESS_TOKEN));
    config.api.base_url = format!("{}/v2/", server.uri());
    config.api.timeout_secs = 5;
    config
}

/// Build a record from a JSON object literal.
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("record must be a JSON object, got {other}"),
    }
}

/// Decode every request body the server received as a JSON array.
pub async fn received_batches(server: &MockServer) -> Vec<Vec<Value>> {
    server
        .received_requests()
        .await
        .expect("request recording enabled")
        .iter()
        .map(|request| serde_json::from_slice(&request.body).expect("body is a JSON array"))
        .collect()
}

/// Pusher wired like `pusher_from_config`, with system proxies disabled so
/// requests to the mock server never leave the host.
pub fn pusher_for(server: &MockServer, batch_size: usize) -> BatchPusher {
    let config = config_for(server);
    let transport = HttpTransportBuilder::from_config(&config.api)
        .system_proxy(false)
        .build()
        .expect("http transport");

    let client = ApiClient::builder()
        .credentials(config.credentials.clone())
        .transport(Arc::new(transport))
        .encoder(encoder_for(config.api.wire_format))
        .base_url(config.api.base_url.clone())
        .build()
        .expect("api client");

    BatchPusher::new(Arc::new(client)).with_batch_size(batch_size)
}
