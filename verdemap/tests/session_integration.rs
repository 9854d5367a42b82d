//! End-to-end session flow against a scripted processing service.
//!
//! Exercises the full path the UI takes: draw, submit, admission control,
//! the asynchronous processing call, layer-cursor interaction, and
//! supersession of an in-flight submission.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::Semaphore;

use verdemap::admission::{AdmissionConfig, DateRange, Frequency, RequestParams};
use verdemap::aoi::{GeoBounds, LonLat, Polygon};
use verdemap::ndvi::{ClientError, NdviClient, NdviResponse, SeriesPoint};
use verdemap::overlay::{LayerDescriptor, MapSurface};
use verdemap::session::{ChartSink, SessionEvent, SessionRunner, SessionState};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn field() -> Polygon {
    Polygon::new(vec![
        LonLat::new(14.30, 48.10),
        LonLat::new(14.32, 48.10),
        LonLat::new(14.32, 48.12),
        LonLat::new(14.30, 48.12),
    ])
}

fn range() -> DateRange {
    DateRange::new(date(2024, 3, 1), date(2024, 4, 30))
}

fn scripted_response(tag: f64, days: &[u32]) -> NdviResponse {
    NdviResponse {
        series: days
            .iter()
            .map(|day| SeriesPoint {
                date: date(2024, 3, *day),
                value: tag,
            })
            .collect(),
        layers: days
            .iter()
            .map(|day| LayerDescriptor {
                date: date(2024, 3, *day),
                image_url: format!("/output/ndvi_2024-03-{:02}.png", day),
                bounds: GeoBounds::new(48.1, 14.3, 48.2, 14.4),
            })
            .collect(),
    }
}

/// Tracks which overlays the "map" currently displays.
#[derive(Default)]
struct FakeMap {
    visible: Vec<NaiveDate>,
}

impl MapSurface for FakeMap {
    fn show_overlay(&mut self, layer: &LayerDescriptor, _opacity: f64) {
        self.visible.push(layer.date);
    }

    fn hide_overlay(&mut self, layer: &LayerDescriptor) {
        self.visible.retain(|d| *d != layer.date);
    }

    fn set_overlay_opacity(&mut self, _layer: &LayerDescriptor, _opacity: f64) {}
}

/// Remembers the last rendered series.
#[derive(Default)]
struct FakeChart {
    series: Option<Vec<SeriesPoint>>,
}

impl ChartSink for FakeChart {
    fn render(&mut self, series: &[SeriesPoint]) {
        self.series = Some(series.to_vec());
    }

    fn clear(&mut self) {
        self.series = None;
    }
}

/// Scripted service: weekly calls block behind a gate, monthly calls
/// answer immediately. The gate is shared so a test can release a blocked
/// call at a chosen moment.
struct ScriptedService {
    gate: Arc<Semaphore>,
    weekly: Result<NdviResponse, ClientError>,
    monthly: Result<NdviResponse, ClientError>,
}

impl NdviClient for ScriptedService {
    async fn process(&self, params: &RequestParams) -> Result<NdviResponse, ClientError> {
        match params.frequency {
            Frequency::Weekly => {
                let _permit = self.gate.acquire().await.expect("gate closed");
                self.weekly.clone()
            }
            Frequency::Monthly => self.monthly.clone(),
        }
    }
}

fn runner(
    service: ScriptedService,
) -> SessionRunner<ScriptedService, FakeMap, FakeChart> {
    SessionRunner::with_timeout(
        AdmissionConfig::default(),
        service,
        FakeMap::default(),
        FakeChart::default(),
        Duration::from_secs(30),
    )
}

#[tokio::test]
async fn test_draw_submit_inspect_flow() {
    let service = ScriptedService {
        gate: Arc::new(Semaphore::new(1)),
        weekly: Ok(scripted_response(0.5, &[7, 14, 21])),
        monthly: Ok(scripted_response(0.9, &[31])),
    };
    let mut runner = runner(service);

    runner
        .session_mut()
        .dispatch(SessionEvent::PolygonDrawn(field()));
    let state = runner.submit_and_wait(range(), Frequency::Weekly).await;
    assert_eq!(*state, SessionState::Succeeded { layer_count: 3 });

    // Most recent layer is shown by default.
    assert_eq!(runner.session().surface().visible, vec![date(2024, 3, 21)]);
    assert_eq!(
        runner.session().chart().series.as_ref().unwrap().len(),
        3
    );

    // Scrub through the sequence; exactly one overlay stays visible.
    for index in [0_i64, 2, 1, -9, 50] {
        runner
            .session_mut()
            .dispatch(SessionEvent::SetLayerIndex(index));
        assert_eq!(
            runner.session().surface().visible.len(),
            1,
            "scrubbing to {} left {} overlays visible",
            index,
            runner.session().surface().visible.len()
        );
    }

    runner.session_mut().dispatch(SessionEvent::SetOpacity(0.3));
    assert_eq!(runner.session().cursor().unwrap().opacity(), 0.3);

    runner.shutdown();
}

#[tokio::test]
async fn test_oversized_area_never_reaches_the_service() {
    let service = ScriptedService {
        gate: Arc::new(Semaphore::new(0)),
        weekly: Ok(scripted_response(0.5, &[7])),
        monthly: Ok(scripted_response(0.5, &[7])),
    };
    let mut runner = runner(service);

    let continent = Polygon::new(vec![
        LonLat::new(5.0, 45.0),
        LonLat::new(15.0, 45.0),
        LonLat::new(15.0, 55.0),
        LonLat::new(5.0, 55.0),
    ]);
    runner
        .session_mut()
        .dispatch(SessionEvent::PolygonDrawn(continent));

    let state = runner.submit_and_wait(range(), Frequency::Weekly).await;
    assert!(
        matches!(state, SessionState::Rejected(_)),
        "expected rejection, got {:?}",
        state
    );
    runner.shutdown();
}

#[tokio::test]
async fn test_superseding_submission_owns_the_final_display() {
    let gate = Arc::new(Semaphore::new(0));
    let service = ScriptedService {
        gate: Arc::clone(&gate),
        weekly: Ok(scripted_response(1.0, &[7, 14])),
        monthly: Ok(scripted_response(2.0, &[31])),
    };
    let mut runner = runner(service);
    runner
        .session_mut()
        .dispatch(SessionEvent::PolygonDrawn(field()));

    // Submission A blocks inside the service; B supersedes it.
    runner.submit(range(), Frequency::Weekly);
    runner.submit(range(), Frequency::Monthly);

    let state = runner.next_completion().await;
    assert_eq!(*state, SessionState::Succeeded { layer_count: 1 });

    // A finally answers; its completion must change nothing.
    gate.add_permits(1);
    runner.next_completion().await;

    let session = runner.session();
    assert_eq!(*session.state(), SessionState::Succeeded { layer_count: 1 });
    assert_eq!(session.chart().series.as_ref().unwrap()[0].value, 2.0);
    assert_eq!(session.surface().visible, vec![date(2024, 3, 31)]);

    runner.shutdown();
}
