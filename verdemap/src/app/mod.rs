//! Application wiring and lifecycle.
//!
//! This module combines the admission limits, the HTTP client, and the
//! session runner into one bootstrap call so hosts configure and start a
//! session in a single, testable place.
//!
//! # Example
//!
//! ```ignore
//! use verdemap::app::{build_runner, AppConfig};
//!
//! let config = AppConfig::new("http://localhost:5000/process-ndvi");
//! let mut runner = build_runner(&config, surface, chart)?;
//!
//! runner.session_mut().dispatch(SessionEvent::PolygonDrawn(polygon));
//! let state = runner.submit_and_wait(range, frequency).await;
//! ```

mod config;
mod error;

pub use config::{AppConfig, ClientConfig, DEFAULT_ENDPOINT};
pub use error::AppError;

use crate::ndvi::{HttpNdviClient, ReqwestClient};
use crate::overlay::MapSurface;
use crate::session::{ChartSink, SessionRunner};

/// Builds a session runner talking to the configured processing endpoint.
pub fn build_runner<S: MapSurface, C: ChartSink>(
    config: &AppConfig,
    surface: S,
    chart: C,
) -> Result<SessionRunner<HttpNdviClient<ReqwestClient>, S, C>, AppError> {
    let http = ReqwestClient::with_timeout(config.client.http_timeout)?;
    let client = HttpNdviClient::new(http, config.client.endpoint.clone());
    Ok(SessionRunner::with_timeout(
        config.admission.clone(),
        client,
        surface,
        chart,
        config.client.call_timeout,
    ))
}
