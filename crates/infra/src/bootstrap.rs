//! Wiring of core services from configuration

use std::sync::Arc;

use stitch_core::{ApiClient, BatchPusher};
use stitch_domain::{Result, StitchConfig};

use crate::encoding::encoder_for;
use crate::http::HttpTransport;

/// Build an [`ApiClient`] backed by the reqwest transport and the configured
/// wire encoder.
pub fn client_from_config(config: &StitchConfig) -> Result<ApiClient> {
    let transport = HttpTransport::from_config(&config.api)?;

    tracing::debug!(
        base_url = %config.api.base_url,
        wire_format = %config.api.wire_format,
        timeout_secs = config.api.timeout_secs,
        "building Stitch API client"
    );

    ApiClient::builder()
        .credentials(config.credentials.clone())
        .transport(Arc::new(transport))
        .encoder(encoder_for(config.api.wire_format))
        .base_url(config.api.base_url.clone())
        .build()
}

/// Build a [`BatchPusher`] using `push.batch_size` from the configuration.
pub fn pusher_from_config(config: &StitchConfig) -> Result<BatchPusher> {
    let client = client_from_config(config)?;
    Ok(BatchPusher::new(Arc::new(client)).with_batch_size(config.push.batch_size))
}
