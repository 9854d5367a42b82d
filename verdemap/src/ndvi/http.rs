//! HTTP client abstraction for testability

use std::future::Future;
use std::time::Duration;

use serde_json::Value;

use super::types::ClientError;

/// Default HTTP request timeout in seconds.
///
/// NDVI processing is a long-running call; the service searches the imagery
/// catalog and renders one raster per sampled interval before answering.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 180;

/// A raw HTTP response: status plus body bytes.
///
/// Non-2xx responses are returned, not mapped to errors, because the
/// processing service carries its failure reason in the error payload.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for asynchronous HTTP operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP POST with a JSON body.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `body` - The JSON request body
    ///
    /// # Returns
    ///
    /// The response (any status) or a transport-level error.
    fn post_json(
        &self,
        url: &str,
        body: &Value,
    ) -> impl Future<Output = Result<HttpResponse, ClientError>> + Send;
}

/// Real async HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with the default timeout.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
    }

    /// Creates a new ReqwestClient with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for ReqwestClient {
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, ClientError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to read response: {}", e)))?
            .to_vec();

        Ok(HttpResponse { status, body })
    }
}
