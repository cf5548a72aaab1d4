//! reqwest-backed implementation of the transport port

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use stitch_core::ports::{Transport, TransportRequest, TransportResponse};
use stitch_domain::constants::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS, USER_AGENT};
use stitch_domain::{ApiConfig, Result, StitchError};
use tracing::debug;

use crate::errors::InfraError;

/// HTTP transport with timeout support.
///
/// Performs exactly one attempt per request; retry policy belongs to the
/// caller.
#[derive(Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
}

impl HttpTransport {
    /// Start building a new HTTP transport.
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Transport configured from the `[api]` section.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        HttpTransportBuilder::from_config(config).build()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, request: &TransportRequest) -> Result<TransportResponse> {
        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        debug!(url = %request.url, "sending HTTP request");

        let response = builder.send().await.map_err(|err| {
            debug!(url = %request.url, error = %err, "HTTP request failed");
            StitchError::from(InfraError::from(err))
        })?;

        let status = response.status().as_u16();
        debug!(url = %request.url, status, "received HTTP response");

        let body = response.text().await.map_err(|err| StitchError::from(InfraError::from(err)))?;

        Ok(TransportResponse { status, body })
    }
}

/// Builder for [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    timeout: Duration,
    connect_timeout: Duration,
    user_agent: String,
    system_proxy: bool,
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
            system_proxy: true,
        }
    }
}

impl HttpTransportBuilder {
    /// Builder preloaded with the timeouts of the `[api]` section.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::default()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
    }

    /// Total time allowed for one request, response body included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Time allowed to establish the TCP/TLS connection.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// `User-Agent` header sent with every request.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` (on by default).
    pub fn system_proxy(mut self, enabled: bool) -> Self {
        self.system_proxy = enabled;
        self
    }

    /// Build the underlying `reqwest` client.
    pub fn build(self) -> Result<HttpTransport> {
        let mut builder = ReqwestClient::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent);

        if !self.system_proxy {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|err| StitchError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(HttpTransport { client })
    }
}
