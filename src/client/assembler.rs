//! Fold of stream events into a [`BatchResult`].

use super::error::ClientError;
use crate::models::{BatchMetadata, BatchResult, ObservationFrame, StreamEvent};

/// Collects frames and metadata in whatever order they arrive.
///
/// The batch is complete once metadata has been seen and the number of
/// frames equals its declared `frame_count`.
#[derive(Debug, Clone)]
pub struct BatchAssembler {
    expected_hint: usize,
    frames: Vec<ObservationFrame>,
    metadata: Option<BatchMetadata>,
}

impl BatchAssembler {
    /// `expected_hint` is the requested frame count, used for progress
    /// until metadata arrives.
    pub fn new(expected_hint: usize) -> Self {
        Self {
            expected_hint,
            frames: Vec::with_capacity(expected_hint.min(10_000)),
            metadata: None,
        }
    }

    pub fn push(&mut self, event: StreamEvent) -> Result<(), ClientError> {
        match event {
            StreamEvent::Frame(frame) => {
                if let Some(last) = self.frames.last() {
                    if frame.datetime <= last.datetime {
                        return Err(ClientError::Transport(format!(
                            "frame {} arrived out of order after {}",
                            frame.datetime, last.datetime
                        )));
                    }
                }
                self.frames.push(frame);
            }
            StreamEvent::Metadata(metadata) => {
                if self.metadata.is_some() {
                    return Err(ClientError::Transport(
                        "received a second metadata event".to_string(),
                    ));
                }
                self.metadata = Some(metadata);
            }
            StreamEvent::Error(failure) => return Err(failure.into()),
        }

        if let Some(metadata) = &self.metadata {
            if self.frames.len() > metadata.frame_count {
                return Err(ClientError::Transport(format!(
                    "received {} frames but metadata declares {}",
                    self.frames.len(),
                    metadata.frame_count
                )));
            }
        }
        Ok(())
    }

    pub fn received(&self) -> usize {
        self.frames.len()
    }

    /// Declared frame count once metadata is known, else the hint.
    pub fn expected(&self) -> usize {
        self.metadata
            .as_ref()
            .map(|m| m.frame_count)
            .unwrap_or(self.expected_hint)
    }

    pub fn is_complete(&self) -> bool {
        self.metadata
            .as_ref()
            .is_some_and(|m| m.frame_count == self.frames.len())
    }

    pub fn finish(self) -> Result<BatchResult, ClientError> {
        match self.metadata {
            Some(metadata) if metadata.frame_count == self.frames.len() => Ok(BatchResult {
                frames: self.frames,
                metadata,
            }),
            Some(metadata) => Err(ClientError::Transport(format!(
                "stream ended after {} of {} frames",
                self.frames.len(),
                metadata.frame_count
            ))),
            None => Err(ClientError::Transport(format!(
                "stream ended after {} frames without metadata",
                self.frames.len()
            ))),
        }
    }
}
