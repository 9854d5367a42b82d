//! NDVI processing service client
//!
//! The backend computation is an opaque asynchronous RPC: one POST carrying
//! the polygon, date range, and cadence; one JSON answer carrying the chart
//! series and the per-date image layers.
//!
//! # Architecture
//!
//! ```text
//! RequestParams ──► ProcessRequest (JSON) ──► AsyncHttpClient ──► service
//!                                                   │
//! NdviResponse ◄── ProcessResponse / ErrorResponse ◄┘
//! ```
//!
//! [`NdviClient`] is the seam the session driver depends on;
//! [`HttpNdviClient`] is the real implementation over any
//! [`AsyncHttpClient`].

mod http;
mod types;

pub use http::{AsyncHttpClient, HttpResponse, ReqwestClient, DEFAULT_HTTP_TIMEOUT_SECS};
pub use types::{
    ClientError, ErrorResponse, NdviResponse, ProcessRequest, ProcessResponse, SeriesPoint,
};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;

use std::future::Future;

use tracing::{debug, warn};

use crate::admission::RequestParams;

/// Trait for issuing one NDVI processing call.
///
/// Implementations must be cancellation-tolerant: a caller may drop the
/// returned future at any time and discard the result.
pub trait NdviClient: Send + Sync {
    /// Submits the request and decodes the answer.
    fn process(
        &self,
        params: &RequestParams,
    ) -> impl Future<Output = Result<NdviResponse, ClientError>> + Send;
}

/// HTTP implementation of [`NdviClient`].
pub struct HttpNdviClient<C: AsyncHttpClient> {
    http_client: C,
    endpoint: String,
}

impl<C: AsyncHttpClient> HttpNdviClient<C> {
    /// Creates a client posting to the given processing endpoint URL.
    pub fn new(http_client: C, endpoint: impl Into<String>) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
        }
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl<C: AsyncHttpClient> NdviClient for HttpNdviClient<C> {
    async fn process(&self, params: &RequestParams) -> Result<NdviResponse, ClientError> {
        let body = serde_json::to_value(ProcessRequest::from(params))
            .map_err(|e| ClientError::Payload(format!("Failed to encode request: {}", e)))?;

        debug!(
            endpoint = %self.endpoint,
            vertices = params.polygon.vertices().len(),
            start = %params.range.start,
            end = %params.range.end,
            frequency = params.frequency.as_str(),
            "Submitting NDVI processing request"
        );

        let response = self.http_client.post_json(&self.endpoint, &body).await?;

        if response.is_success() {
            let wire: ProcessResponse = serde_json::from_slice(&response.body)
                .map_err(|e| ClientError::Payload(format!("Undecodable success body: {}", e)))?;
            return Ok(NdviResponse::from(wire));
        }

        // The service reports its failure reason in the error payload when
        // it can; fall back to the bare status otherwise.
        let message = match serde_json::from_slice::<ErrorResponse>(&response.body) {
            Ok(decoded) => decoded.error,
            Err(_) => format!("processing service returned status {}", response.status),
        };
        warn!(status = response.status, error = %message, "Processing request failed");
        Err(ClientError::Backend(message))
    }
}
