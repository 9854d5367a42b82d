//! Wire types and errors for the NDVI processing service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::admission::RequestParams;
use crate::aoi::GeoBounds;
use crate::overlay::LayerDescriptor;

/// One scalar index value on one sampled date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Sampled date.
    pub date: NaiveDate,
    /// Mean NDVI over the area of interest; treated as an opaque scalar.
    pub value: f64,
}

/// Errors from talking to the processing service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// The service could not be reached at all.
    #[error("could not reach the processing service: {0}")]
    Transport(String),

    /// The service answered with an error payload; the message is surfaced
    /// verbatim.
    #[error("{0}")]
    Backend(String),

    /// The service answered but the payload could not be decoded.
    #[error("unexpected response from the processing service: {0}")]
    Payload(String),

    /// The call outlived the configured client-side deadline.
    #[error("processing timed out after {0} seconds")]
    Timeout(u64),
}

/// JSON request body for the processing endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    /// Ring as `[lon, lat]` pairs, not closed-duplicated.
    pub polygon: Vec<[f64; 2]>,
    /// ISO start date.
    pub start_date: NaiveDate,
    /// ISO end date.
    pub end_date: NaiveDate,
    /// "weekly" or "monthly".
    pub frequency: crate::admission::Frequency,
}

impl From<&RequestParams> for ProcessRequest {
    fn from(params: &RequestParams) -> Self {
        Self {
            polygon: params.polygon.to_pairs(),
            start_date: params.range.start,
            end_date: params.range.end,
            frequency: params.frequency,
        }
    }
}

/// One series entry as serialized by the service.
#[derive(Debug, Deserialize)]
pub struct WireSeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// One image layer as serialized by the service.
#[derive(Debug, Deserialize)]
pub struct WireLayer {
    pub date: NaiveDate,
    pub url: String,
    /// Corner pair `[[south, west], [north, east]]`.
    pub bounds: [[f64; 2]; 2],
}

/// Success payload from the processing endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub graph_data: Vec<WireSeriesPoint>,
    pub image_layers: Vec<WireLayer>,
}

/// Error payload from the processing endpoint.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Decoded processing result: the chart series and the layer sequence.
///
/// Both sequences are chronological. Either may be empty when no cloud-free
/// imagery was found; that is still a successful outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct NdviResponse {
    /// Time-ordered series for the chart capability.
    pub series: Vec<SeriesPoint>,
    /// Time-ordered layer sequence for the cursor.
    pub layers: Vec<LayerDescriptor>,
}

impl From<ProcessResponse> for NdviResponse {
    fn from(wire: ProcessResponse) -> Self {
        let mut series: Vec<SeriesPoint> = wire
            .graph_data
            .into_iter()
            .map(|p| SeriesPoint {
                date: p.date,
                value: p.value,
            })
            .collect();
        series.sort_by_key(|p| p.date);

        let mut layers: Vec<LayerDescriptor> = wire
            .image_layers
            .into_iter()
            .map(|l| LayerDescriptor {
                date: l.date,
                image_url: l.url,
                bounds: GeoBounds::from_corner_pairs(l.bounds),
            })
            .collect();
        layers.sort_by_key(|l| l.date);

        Self { series, layers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission::{DateRange, Frequency};
    use crate::aoi::{LonLat, Polygon};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let params = RequestParams {
            polygon: Polygon::new(vec![
                LonLat::new(14.3, 48.1),
                LonLat::new(14.4, 48.1),
                LonLat::new(14.4, 48.2),
            ]),
            range: DateRange::new(date(2024, 3, 1), date(2024, 5, 1)),
            frequency: Frequency::Weekly,
        };

        let body = serde_json::to_value(ProcessRequest::from(&params)).unwrap();
        assert_eq!(body["polygon"][0][0], 14.3);
        assert_eq!(body["polygon"][0][1], 48.1);
        assert_eq!(body["startDate"], "2024-03-01");
        assert_eq!(body["endDate"], "2024-05-01");
        assert_eq!(body["frequency"], "weekly");
    }

    #[test]
    fn test_response_decodes_and_sorts_chronologically() {
        let raw = serde_json::json!({
            "graphData": [
                {"date": "2024-05-15", "value": 0.61},
                {"date": "2024-05-01", "value": 0.43}
            ],
            "imageLayers": [
                {"date": "2024-05-15", "url": "/output/b.png",
                 "bounds": [[48.1, 14.3], [48.2, 14.4]]},
                {"date": "2024-05-01", "url": "/output/a.png",
                 "bounds": [[48.1, 14.3], [48.2, 14.4]]}
            ]
        });

        let wire: ProcessResponse = serde_json::from_value(raw).unwrap();
        let response = NdviResponse::from(wire);

        assert_eq!(response.series[0].date, date(2024, 5, 1));
        assert_eq!(response.series[1].value, 0.61);
        assert_eq!(response.layers[0].image_url, "/output/a.png");
        assert_eq!(response.layers[1].date, date(2024, 5, 15));
        assert_eq!(response.layers[0].bounds.north, 48.2);
    }

    #[test]
    fn test_empty_result_is_decodable() {
        let raw = serde_json::json!({"graphData": [], "imageLayers": []});
        let wire: ProcessResponse = serde_json::from_value(raw).unwrap();
        let response = NdviResponse::from(wire);
        assert!(response.series.is_empty());
        assert!(response.layers.is_empty());
    }

    #[test]
    fn test_error_payload_decodes() {
        let raw = serde_json::json!({"error": "Polygon is too large."});
        let decoded: ErrorResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(decoded.error, "Polygon is too large.");
    }
}
