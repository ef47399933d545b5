//! Streaming Transport producer.
//!
//! Frames are computed one at a time, each on the blocking pool under its
//! own timeout, and yielded as soon as they are ready. Nothing is computed
//! ahead of the consumer: when the stream is dropped, at most the frame in
//! flight finishes.

use futures::Stream;
use std::time::Duration;

use super::batch::BatchPlan;
use super::observation::ObservationEngine;
use crate::error::ObservationError;
use crate::models::{StreamEvent, StreamFailure};

pub const DEFAULT_FRAME_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy)]
pub struct StreamOptions {
    /// Budget for a single frame's computation.
    pub frame_timeout: Duration,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            frame_timeout: DEFAULT_FRAME_TIMEOUT,
        }
    }
}

impl From<&ObservationError> for StreamFailure {
    fn from(err: &ObservationError) -> Self {
        StreamFailure {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Events for a validated plan: one `Frame` per timestamp in order, then
/// one `Metadata`. The first failure yields a single `Error` and ends the
/// stream.
pub fn observation_events(
    engine: ObservationEngine,
    plan: BatchPlan,
    options: StreamOptions,
) -> impl Stream<Item = StreamEvent> + Send + 'static {
    async_stream::stream! {
        let location = *plan.location();
        for index in 0..plan.frame_count() {
            let datetime = plan.timestamp(index);
            let worker = engine.clone();
            let task = tokio::task::spawn_blocking(move || worker.frame(datetime, &location));

            let failure = match tokio::time::timeout(options.frame_timeout, task).await {
                Ok(Ok(Ok(frame))) => {
                    yield StreamEvent::Frame(frame);
                    continue;
                }
                Ok(Ok(Err(err))) => err,
                Ok(Err(join_err)) => ObservationError::computation(format!(
                    "frame {} worker failed: {}",
                    index, join_err
                )),
                Err(_) => ObservationError::Timeout(options.frame_timeout.as_millis() as u64),
            };

            log::warn!("stream stopped at frame {}/{}: {}", index, plan.frame_count(), failure);
            yield StreamEvent::Error(StreamFailure::from(&failure));
            return;
        }

        log::debug!("stream delivered {} frames", plan.frame_count());
        yield StreamEvent::Metadata(plan.metadata());
    }
}
