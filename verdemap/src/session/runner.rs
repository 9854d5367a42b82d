//! Async driver for the processing session.
//!
//! [`SessionRunner`] owns a [`ProcessingSession`] and executes its backend
//! directives on spawned tasks, so the session itself stays synchronous and
//! single-owner. Completions flow back over a channel and are applied in
//! the order they arrive; the session's sequence guard decides whether each
//! one is still current.
//!
//! The runner also resolves the client-side deadline question: a call that
//! outlives [`DEFAULT_CALL_TIMEOUT_SECS`] (configurable) fails the
//! submission instead of leaving it in flight forever.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::admission::{AdmissionConfig, DateRange, Frequency};
use crate::ndvi::{ClientError, NdviClient, NdviResponse};
use crate::overlay::MapSurface;

use super::{ChartSink, Directive, ProcessingSession, SessionEvent, SessionState};

/// Default client-side deadline for one processing call, in seconds.
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 180;

struct Completion {
    seq: u64,
    outcome: Result<NdviResponse, ClientError>,
}

/// Drives a [`ProcessingSession`] against a real [`NdviClient`].
///
/// Superseded calls are not aborted at the transport level; their tasks run
/// to completion and their results are discarded by the sequence guard.
/// The cancellation token only stops outstanding tasks on shutdown.
pub struct SessionRunner<N, S, C>
where
    N: NdviClient + 'static,
    S: MapSurface,
    C: ChartSink,
{
    session: ProcessingSession<S, C>,
    client: Arc<N>,
    call_timeout: Duration,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    cancellation: CancellationToken,
}

impl<N, S, C> SessionRunner<N, S, C>
where
    N: NdviClient + 'static,
    S: MapSurface,
    C: ChartSink,
{
    /// Creates a runner with the default call timeout.
    pub fn new(config: AdmissionConfig, client: N, surface: S, chart: C) -> Self {
        Self::with_timeout(
            config,
            client,
            surface,
            chart,
            Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECS),
        )
    }

    /// Creates a runner with a custom call timeout.
    pub fn with_timeout(
        config: AdmissionConfig,
        client: N,
        surface: S,
        chart: C,
        call_timeout: Duration,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            session: ProcessingSession::new(config, surface, chart),
            client: Arc::new(client),
            call_timeout,
            completion_tx,
            completion_rx,
            cancellation: CancellationToken::new(),
        }
    }

    /// Submits the session's current polygon for processing.
    ///
    /// Runs admission control synchronously; on acceptance the RPC is
    /// issued on a spawned task. Returns the state the submission landed
    /// in: `Rejected` or `InFlight`.
    pub fn submit(&mut self, range: DateRange, frequency: Frequency) -> &SessionState {
        let directive = self
            .session
            .dispatch(SessionEvent::Submit { range, frequency });
        if let Some(Directive::CallBackend { seq, params }) = directive {
            self.spawn_call(seq, params);
        }
        self.session.state()
    }

    fn spawn_call(&self, seq: u64, params: crate::admission::RequestParams) {
        let client = Arc::clone(&self.client);
        let tx = self.completion_tx.clone();
        let cancel = self.cancellation.clone();
        let timeout = self.call_timeout;

        tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    debug!(seq, "Processing call cancelled by shutdown");
                    return;
                }

                result = tokio::time::timeout(timeout, client.process(&params)) => {
                    match result {
                        Ok(outcome) => outcome,
                        Err(_) => Err(ClientError::Timeout(timeout.as_secs())),
                    }
                }
            };

            // The receiver is gone only when the runner was dropped.
            let _ = tx.send(Completion { seq, outcome });
        });
    }

    /// Waits for the next completion and applies it to the session.
    ///
    /// Stale completions are applied too — the session discards them — so
    /// one call to this method does not necessarily change the state.
    /// Returns the state after the completion was processed.
    pub async fn next_completion(&mut self) -> &SessionState {
        if let Some(completion) = self.completion_rx.recv().await {
            self.session.dispatch(SessionEvent::Completed {
                seq: completion.seq,
                outcome: completion.outcome,
            });
        }
        self.session.state()
    }

    /// Submits and pumps completions until the submission settles.
    ///
    /// Convenience for one-shot drivers such as the CLI; interactive hosts
    /// call [`submit`](Self::submit) and [`next_completion`](Self::next_completion)
    /// themselves so they can interleave new input.
    pub async fn submit_and_wait(&mut self, range: DateRange, frequency: Frequency) -> &SessionState {
        self.submit(range, frequency);
        while !self.session.state().is_terminal() {
            self.next_completion().await;
        }
        self.session.state()
    }

    /// The owned session, for feeding draw and slider events.
    pub fn session_mut(&mut self) -> &mut ProcessingSession<S, C> {
        &mut self.session
    }

    /// Read access to the owned session.
    pub fn session(&self) -> &ProcessingSession<S, C> {
        &self.session
    }

    /// Stops outstanding call tasks. Safe to call once at teardown.
    pub fn shutdown(&self) {
        self.cancellation.cancel();
    }
}
