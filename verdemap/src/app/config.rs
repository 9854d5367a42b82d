//! Application configuration for a Verdemap session.
//!
//! This module defines `AppConfig` which combines the admission limits and
//! the processing-service client settings into one configuration surface,
//! so a host (CLI or embedding UI) configures everything in one place.

use std::time::Duration;

use crate::admission::AdmissionConfig;
use crate::ndvi::DEFAULT_HTTP_TIMEOUT_SECS;
use crate::session::DEFAULT_CALL_TIMEOUT_SECS;

/// Default processing endpoint for local development.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/process-ndvi";

/// Processing-service client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// URL of the processing endpoint.
    pub endpoint: String,

    /// Transport-level timeout for one HTTP exchange.
    pub http_timeout: Duration,

    /// Overall deadline for one submission, enforced by the session
    /// runner. Kept separate from the HTTP timeout so a host can retry
    /// transport hiccups inside one submission window later without
    /// changing the user-facing deadline.
    pub call_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            call_timeout: Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Creates a config pointing at the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Set the overall submission deadline.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Set the transport-level timeout.
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }
}

/// Top-level configuration combining all component configs.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    /// Admission-control limits.
    pub admission: AdmissionConfig,

    /// Processing-service client settings.
    pub client: ClientConfig,
}

impl AppConfig {
    /// Creates a config for the given endpoint with default limits.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            admission: AdmissionConfig::default(),
            client: ClientConfig::new(endpoint),
        }
    }

    /// Set the admission limits.
    pub fn with_admission(mut self, admission: AdmissionConfig) -> Self {
        self.admission = admission;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.client.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.client.call_timeout, Duration::from_secs(180));
        assert_eq!(config.admission.max_area_sq_km, 25.0);
    }

    #[test]
    fn test_builder_overrides() {
        let config = AppConfig::new("https://ndvi.example/process")
            .with_admission(AdmissionConfig::default().with_max_area_sq_km(50.0));
        assert_eq!(config.client.endpoint, "https://ndvi.example/process");
        assert_eq!(config.admission.max_area_sq_km, 50.0);

        let client = ClientConfig::default().with_call_timeout(Duration::from_secs(30));
        assert_eq!(client.call_timeout, Duration::from_secs(30));
    }
}
