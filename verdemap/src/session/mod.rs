//! Request-lifecycle state machine
//!
//! [`ProcessingSession`] coordinates user input, one in-flight processing
//! call, and the resulting time-indexed layer set. It owns the current
//! polygon, the session state, and — after a success — the chart series and
//! the [`LayerCursor`].
//!
//! # Architecture
//!
//! ```text
//! draw / submit / slider events ──► dispatch(event) ──► Directive
//!                                        │                  │
//!                                  state + cursor      SessionRunner
//!                                  chart + surface          │
//!                                        ▲                  ▼
//!                                        └── Completed ◄── RPC
//! ```
//!
//! # Supersession
//!
//! Every submit bumps a monotonically increasing sequence number, and a
//! completion is applied only if its number matches the current one. A new
//! submission therefore always wins over an older in-flight call: the older
//! call is not aborted at the transport level, its result is ignored when it
//! eventually arrives. An older response can never overwrite a newer
//! session's state, regardless of arrival order.

mod runner;
mod types;

pub use runner::{SessionRunner, DEFAULT_CALL_TIMEOUT_SECS};
pub use types::{ChartSink, Directive, SessionEvent, SessionState};

#[cfg(test)]
pub use types::tests::RecordingChart;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::admission::{self, AdmissionConfig, DateRange, Frequency, Rejection, RequestParams, Verdict};
use crate::aoi::Polygon;
use crate::ndvi::{ClientError, NdviResponse, SeriesPoint};
use crate::overlay::{LayerCursor, MapSurface};

fn current_date() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// The interaction core for one map view.
///
/// All state mutation happens synchronously inside [`dispatch`](Self::dispatch);
/// the only suspension point of the whole design is the RPC, which runs
/// outside the session and reports back through
/// [`SessionEvent::Completed`].
pub struct ProcessingSession<S: MapSurface, C: ChartSink> {
    config: AdmissionConfig,
    surface: S,
    chart: C,
    /// Snapshot source for "today"; injectable so admission checks are
    /// deterministic under test.
    today: fn() -> NaiveDate,
    state: SessionState,
    /// Submission counter; bumped on every submit attempt.
    seq: u64,
    polygon: Option<Polygon>,
    series: Vec<SeriesPoint>,
    cursor: Option<LayerCursor>,
}

impl<S: MapSurface, C: ChartSink> ProcessingSession<S, C> {
    /// Creates an idle session over the given capabilities.
    pub fn new(config: AdmissionConfig, surface: S, chart: C) -> Self {
        Self {
            config,
            surface,
            chart,
            today: current_date,
            state: SessionState::Idle,
            seq: 0,
            polygon: None,
            series: Vec::new(),
            cursor: None,
        }
    }

    /// Replaces the clock used for the "today" snapshot.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Feeds one event through the state machine.
    ///
    /// Returns a [`Directive`] when the driver has work to do; `None`
    /// otherwise. Never panics and never leaves the session in a corrupt
    /// state: every failure is terminal for the current submission only.
    pub fn dispatch(&mut self, event: SessionEvent) -> Option<Directive> {
        match event {
            SessionEvent::PolygonDrawn(polygon) | SessionEvent::PolygonEdited(polygon) => {
                self.polygon = Some(polygon);
                None
            }
            SessionEvent::PolygonDeleted => {
                self.polygon = None;
                None
            }
            SessionEvent::Submit { range, frequency } => self.submit(range, frequency),
            SessionEvent::Completed { seq, outcome } => {
                self.complete(seq, outcome);
                None
            }
            SessionEvent::SetLayerIndex(index) => {
                if let Some(cursor) = self.cursor.as_mut() {
                    cursor.set_index(index, &mut self.surface);
                }
                None
            }
            SessionEvent::SetOpacity(opacity) => {
                if let Some(cursor) = self.cursor.as_mut() {
                    cursor.set_opacity(opacity, &mut self.surface);
                }
                None
            }
        }
    }

    fn submit(&mut self, range: DateRange, frequency: Frequency) -> Option<Directive> {
        // Every attempt supersedes whatever came before it, including a
        // still-outstanding call, whose completion will no longer match.
        self.seq += 1;
        self.state = SessionState::Validating;
        debug!(seq = self.seq, "Validating submission");

        let verdict = admission::validate(
            self.polygon.as_ref(),
            range,
            frequency,
            (self.today)(),
            &self.config,
        );

        match verdict {
            Verdict::Rejected(reason) => {
                // Prior successful results stay on screen; a local
                // validation failure never contacts the network and is
                // recoverable by editing the input.
                info!(seq = self.seq, reason = %reason, "Submission rejected");
                self.state = SessionState::Rejected(reason);
                None
            }
            Verdict::Accepted { estimated_sq_km } => {
                let Some(polygon) = self.polygon.clone() else {
                    // Unreachable in practice: acceptance implies a ring.
                    self.state = SessionState::Rejected(Rejection::NoPolygon);
                    return None;
                };

                self.clear_results();
                info!(
                    seq = self.seq,
                    area_sq_km = estimated_sq_km,
                    start = %range.start,
                    end = %range.end,
                    frequency = frequency.as_str(),
                    "Submission accepted, issuing processing call"
                );
                self.state = SessionState::InFlight { seq: self.seq };
                Some(Directive::CallBackend {
                    seq: self.seq,
                    params: RequestParams {
                        polygon,
                        range,
                        frequency,
                    },
                })
            }
        }
    }

    fn complete(&mut self, seq: u64, outcome: Result<NdviResponse, ClientError>) {
        let current = matches!(self.state, SessionState::InFlight { seq: s } if s == seq);
        if seq != self.seq || !current {
            debug!(
                stale_seq = seq,
                current_seq = self.seq,
                "Discarding stale completion"
            );
            return;
        }

        match outcome {
            Ok(response) => self.succeed(response),
            Err(error) => {
                warn!(seq, error = %error, "Processing call failed");
                self.state = SessionState::Failed(error);
            }
        }
    }

    fn succeed(&mut self, response: NdviResponse) {
        let layer_count = response.layers.len();

        // Chart and cursor are replaced together; results from different
        // submissions never mix.
        self.series = response.series;
        self.chart.render(&self.series);
        self.cursor = match LayerCursor::new(response.layers) {
            Ok(mut cursor) => {
                cursor.show_initial(&mut self.surface);
                Some(cursor)
            }
            Err(_) => None,
        };

        if layer_count == 0 {
            info!(seq = self.seq, "Processing finished with no imagery found");
        } else {
            info!(seq = self.seq, layers = layer_count, "Processing finished");
        }
        self.state = SessionState::Succeeded { layer_count };
    }

    fn clear_results(&mut self) {
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.hide(&mut self.surface);
        }
        self.cursor = None;
        self.series.clear();
        self.chart.clear();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    /// The current lifecycle state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The polygon owned by the drawing session, if any.
    pub fn polygon(&self) -> Option<&Polygon> {
        self.polygon.as_ref()
    }

    /// The chart series of the most recent success.
    pub fn series(&self) -> &[SeriesPoint] {
        &self.series
    }

    /// The layer cursor of the most recent success, if it had imagery.
    pub fn cursor(&self) -> Option<&LayerCursor> {
        self.cursor.as_ref()
    }

    /// The map surface, for observers.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The chart sink, for observers.
    pub fn chart(&self) -> &C {
        &self.chart
    }
}
