//! HTTP transport seam.
//!
//! Provider clients talk to a trait, not to reqwest, so tests can run
//! against a recording mock (see [`crate::testing::MockTransport`]). Status
//! classification stays out of the transport; the fetch engine owns it.

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::{FetchError, Result};

/// Raw status and body of one provider response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str, cancel: &CancellationToken) -> Result<TransportResponse>;

    async fn post_json(
        &self,
        url: &str,
        body: &Value,
        cancel: &CancellationToken,
    ) -> Result<TransportResponse>;
}

/// Production transport over a shared reqwest client.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Use a caller-configured client (proxies, custom timeouts).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn run(
        &self,
        request: reqwest::RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<TransportResponse> {
        let send = async {
            let response = request.send().await.map_err(FetchError::network)?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(FetchError::network)?;
            Ok(TransportResponse { status, body })
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = send => result,
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, cancel: &CancellationToken) -> Result<TransportResponse> {
        self.run(self.client.get(url), cancel).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: &Value,
        cancel: &CancellationToken,
    ) -> Result<TransportResponse> {
        self.run(self.client.post(url).json(body), cancel).await
    }
}
