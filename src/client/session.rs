//! Client Data Session: observable fetch state for the UI.
//!
//! ```text
//!            fetch_*            success
//!   idle ─────────────► loading ────────► loaded
//!    ▲                    │
//!    │     clear()        │ validation / server / network /
//!    └────────────────────┤ transport error, or cancel()
//!                         ▼
//!                       error
//! ```
//!
//! State is published through a `tokio::sync::watch` channel so any number
//! of observers can follow loading, progress and the final result.

use futures::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use super::assembler::BatchAssembler;
use super::error::ClientError;
use super::transport::ObservationTransport;
use crate::models::BatchResult;
use crate::services::BatchRequest;

/// Snapshot of the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub loading: bool,
    pub error: Option<ClientError>,
    pub data: Option<Arc<BatchResult>>,
    /// Frames received so far
    pub received: usize,
    /// Frames expected; 0 when unknown
    pub expected: usize,
}

impl SessionState {
    /// Fraction of frames received, 0 when the expected count is unknown.
    pub fn progress(&self) -> f64 {
        if self.expected == 0 {
            0.0
        } else {
            (self.received as f64 / self.expected as f64).min(1.0)
        }
    }

    /// Human-readable error, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}

pub struct DataSession {
    transport: Arc<dyn ObservationTransport>,
    state: watch::Sender<SessionState>,
    /// Bumped to abort the fetch in flight
    cancel: watch::Sender<u64>,
    /// Identifies the latest fetch; results of superseded fetches are dropped
    generation: AtomicU64,
}

impl DataSession {
    pub fn new(transport: Arc<dyn ObservationTransport>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        let (cancel, _) = watch::channel(0);
        Self {
            transport,
            state,
            cancel,
            generation: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// One-shot fetch of the whole batch.
    pub async fn fetch_batch(
        &self,
        request: &BatchRequest,
    ) -> Result<Arc<BatchResult>, ClientError> {
        let (generation, mut cancelled) = self.begin(request);

        let outcome = tokio::select! {
            biased;
            _ = cancelled.changed() => Err(ClientError::Cancelled),
            result = self.transport.fetch_batch(request) => result.and_then(check_batch),
        };
        self.finish(generation, outcome)
    }

    /// Incremental fetch; progress is published as each frame arrives.
    pub async fn fetch_batch_streaming(
        &self,
        request: &BatchRequest,
    ) -> Result<Arc<BatchResult>, ClientError> {
        let (generation, mut cancelled) = self.begin(request);

        let opened = tokio::select! {
            biased;
            _ = cancelled.changed() => Err(ClientError::Cancelled),
            stream = self.transport.open_stream(request) => stream,
        };
        let mut events = match opened {
            Ok(events) => events,
            Err(err) => return self.finish(generation, Err(err)),
        };

        let mut assembler = BatchAssembler::new(expected_hint(request));
        let streamed = loop {
            tokio::select! {
                biased;
                _ = cancelled.changed() => break Err(ClientError::Cancelled),
                next = events.next() => match next {
                    Some(Ok(event)) => {
                        if let Err(err) = assembler.push(event) {
                            break Err(err);
                        }
                        self.publish_progress(generation, &assembler);
                        if assembler.is_complete() {
                            break Ok(());
                        }
                    }
                    Some(Err(err)) => break Err(err),
                    None => break Ok(()),
                },
            }
        };
        drop(events);

        let outcome = streamed.and_then(|()| assembler.finish());
        self.finish(generation, outcome)
    }

    /// Abort the fetch in flight. The session ends in the error state with
    /// a cancellation message.
    pub fn cancel(&self) {
        self.cancel.send_modify(|n| *n = n.wrapping_add(1));
    }

    /// Return to idle, aborting any fetch and discarding data and error.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cancel();
        self.state.send_replace(SessionState::default());
    }

    fn begin(&self, request: &BatchRequest) -> (u64, watch::Receiver<u64>) {
        // A new fetch supersedes the previous one
        self.cancel();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let cancelled = self.cancel.subscribe();
        self.state.send_replace(SessionState {
            loading: true,
            error: None,
            data: None,
            received: 0,
            expected: expected_hint(request),
        });
        (generation, cancelled)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn publish_progress(&self, generation: u64, assembler: &BatchAssembler) {
        if !self.is_current(generation) {
            return;
        }
        self.state.send_modify(|state| {
            state.received = assembler.received();
            state.expected = assembler.expected();
        });
    }

    fn finish(
        &self,
        generation: u64,
        outcome: Result<BatchResult, ClientError>,
    ) -> Result<Arc<BatchResult>, ClientError> {
        let outcome = outcome.map(Arc::new);
        if !self.is_current(generation) {
            return outcome;
        }

        match &outcome {
            Ok(batch) => {
                log::debug!("session loaded {} frames", batch.frames.len());
                let count = batch.frames.len();
                self.state.send_replace(SessionState {
                    loading: false,
                    error: None,
                    data: Some(Arc::clone(batch)),
                    received: count,
                    expected: count,
                });
            }
            Err(err) => {
                if err.is_cancellation() {
                    log::info!("session fetch cancelled");
                } else {
                    log::warn!("session fetch failed: {}", err);
                }
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(err.clone());
                    state.data = None;
                });
            }
        }
        outcome
    }
}

fn expected_hint(request: &BatchRequest) -> usize {
    usize::try_from(request.frame_count).unwrap_or(0)
}

fn check_batch(batch: BatchResult) -> Result<BatchResult, ClientError> {
    batch
        .check_invariants()
        .map_err(|e| ClientError::Server(format!("inconsistent batch: {}", e)))?;
    Ok(batch)
}
