//! Session states, events, and the chart-capability seam.

use crate::admission::{DateRange, Frequency, Rejection, RequestParams};
use crate::aoi::Polygon;
use crate::ndvi::{ClientError, NdviResponse, SeriesPoint};

/// Lifecycle state of the processing session.
///
/// Exactly one session is live per map view. `Succeeded` and `Failed` are
/// terminal for a submission; the session itself is long-lived and cycles
/// back through `Validating` on the next submit.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No submission yet, or results torn down.
    Idle,
    /// Admission checks are running (transient within one dispatch).
    Validating,
    /// Admission control refused the submission. Not sticky; the next
    /// submit re-enters `Validating` directly.
    Rejected(Rejection),
    /// One RPC is outstanding; `seq` identifies it for the stale guard.
    /// Observers render this as an indeterminate progress indicator.
    InFlight {
        /// Sequence number of the outstanding call.
        seq: u64,
    },
    /// The RPC answered with a well-formed payload. `layer_count` of zero
    /// means no imagery was found, which is still a success.
    Succeeded {
        /// Number of layers in the completed sequence.
        layer_count: usize,
    },
    /// The RPC failed; the reason is user-visible.
    Failed(ClientError),
}

impl SessionState {
    /// Whether this state ends the current submission.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Rejected(_) | SessionState::Succeeded { .. } | SessionState::Failed(_)
        )
    }

    /// Whether a call is outstanding.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SessionState::InFlight { .. })
    }
}

/// Everything that can happen to a session, from any source: draw toolkit
/// events, the submit action, RPC completions, and slider input.
///
/// Routing every input through one event type keeps each transition
/// testable without a live map or chart.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The user finished drawing a new polygon; replaces any previous one.
    PolygonDrawn(Polygon),
    /// The user edited the current polygon; replaces it wholesale.
    PolygonEdited(Polygon),
    /// The user deleted the polygon.
    PolygonDeleted,
    /// The user requested processing of the current polygon.
    Submit {
        range: DateRange,
        frequency: Frequency,
    },
    /// An RPC issued for submission `seq` finished. Completions whose `seq`
    /// is not the current one are discarded unconditionally.
    Completed {
        seq: u64,
        outcome: Result<NdviResponse, ClientError>,
    },
    /// Position slider moved; value is clamped by the cursor.
    SetLayerIndex(i64),
    /// Opacity slider moved; value is clamped by the cursor.
    SetOpacity(f64),
}

/// Work a dispatch asks its driver to perform.
///
/// The state machine never does I/O itself; an accepted submission hands
/// the driver one backend call tagged with the submission sequence number.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Issue the processing RPC and feed the result back as
    /// [`SessionEvent::Completed`] with the same `seq`.
    CallBackend { seq: u64, params: RequestParams },
}

/// Rendering seam toward the chart capability.
///
/// A render replaces any prior chart wholesale; the sink keeps no history.
pub trait ChartSink {
    /// Renders a time-ordered series, discarding any prior render.
    fn render(&mut self, series: &[SeriesPoint]);

    /// Removes the chart entirely.
    fn clear(&mut self);
}
