//! Batch Generator: evenly spaced frames over a time range.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::observation::ObservationEngine;
use crate::error::{ObservationError, ObservationResult};
use crate::models::{
    parse_date_time, span_hours, BatchMetadata, BatchResult, GeographicLocation,
};

/// Smallest accepted frame count; a span needs two samples.
pub const MIN_FRAME_COUNT: i64 = 2;
/// Largest accepted frame count.
pub const MAX_FRAME_COUNT: i64 = 10_000;

/// Smallest spacing between consecutive frames (nanoseconds).
const MIN_FRAME_STEP_NANOS: i64 = 1_000_000;

pub const DEFAULT_START_TIME: &str = "00:00:00";
pub const DEFAULT_END_TIME: &str = "23:59:59";

fn default_start_time() -> String {
    DEFAULT_START_TIME.to_string()
}

fn default_end_time() -> String {
    DEFAULT_END_TIME.to_string()
}

/// Batch parameters as they arrive from a caller (JSON body or query string).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub elevation: f64,
    pub start_date: String,
    #[serde(default = "default_start_time")]
    pub start_time: String,
    pub end_date: String,
    #[serde(default = "default_end_time")]
    pub end_time: String,
    pub frame_count: i64,
}

impl BatchRequest {
    pub fn location(&self) -> GeographicLocation {
        GeographicLocation {
            latitude: self.latitude,
            longitude: self.longitude,
            elevation: self.elevation,
        }
    }
}

/// A validated batch: location, endpoints and frame count.
///
/// Building a plan performs every check that can fail before computation,
/// so a plan always yields exactly `frame_count` strictly increasing
/// timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPlan {
    location: GeographicLocation,
    start: NaiveDateTime,
    end: NaiveDateTime,
    frame_count: usize,
    span_nanos: i64,
}

impl BatchPlan {
    pub fn new(
        location: GeographicLocation,
        start: NaiveDateTime,
        end: NaiveDateTime,
        frame_count: i64,
    ) -> ObservationResult<Self> {
        if frame_count < MIN_FRAME_COUNT {
            return Err(ObservationError::invalid_input(format!(
                "frame_count must be at least {}, got {}",
                MIN_FRAME_COUNT, frame_count
            )));
        }
        if frame_count > MAX_FRAME_COUNT {
            return Err(ObservationError::invalid_input(format!(
                "frame_count must be at most {}, got {}",
                MAX_FRAME_COUNT, frame_count
            )));
        }
        location.validate()?;
        if end <= start {
            return Err(ObservationError::invalid_input(format!(
                "end datetime ({}) must be after start datetime ({})",
                end, start
            )));
        }

        let span_nanos = (end - start).num_nanoseconds().ok_or_else(|| {
            ObservationError::invalid_input(format!(
                "time range from {} to {} is too long",
                start, end
            ))
        })?;
        let steps = frame_count - 1;
        if span_nanos / steps < MIN_FRAME_STEP_NANOS {
            return Err(ObservationError::invalid_input(format!(
                "time range too short for {} frames; frames must be at least 1 ms apart",
                frame_count
            )));
        }

        Ok(Self {
            location,
            start,
            end,
            frame_count: frame_count as usize,
            span_nanos,
        })
    }

    pub fn from_request(request: &BatchRequest) -> ObservationResult<Self> {
        let start = parse_date_time(&request.start_date, &request.start_time)?;
        let end = parse_date_time(&request.end_date, &request.end_time)?;
        Self::new(request.location(), start, end, request.frame_count)
    }

    pub fn location(&self) -> &GeographicLocation {
        &self.location
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Timestamp of frame `index`: `start + span * index / (N - 1)`.
    pub fn timestamp(&self, index: usize) -> NaiveDateTime {
        let steps = (self.frame_count - 1) as i128;
        let offset = i128::from(self.span_nanos) * index as i128 / steps;
        // offset <= span_nanos, which fits in i64
        self.start + TimeDelta::nanoseconds(offset as i64)
    }

    pub fn timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        (0..self.frame_count).map(move |i| self.timestamp(i))
    }

    pub fn metadata(&self) -> BatchMetadata {
        BatchMetadata {
            location: self.location,
            frame_count: self.frame_count,
            start_datetime: self.start,
            end_datetime: self.end,
            time_span_hours: span_hours(&self.start, &self.end),
        }
    }
}

impl ObservationEngine {
    /// Compute every frame of a plan in timestamp order.
    pub fn run_batch(&self, plan: &BatchPlan) -> ObservationResult<BatchResult> {
        let mut frames = Vec::with_capacity(plan.frame_count());
        for datetime in plan.timestamps() {
            frames.push(self.frame(datetime, plan.location())?);
        }
        log::debug!(
            "computed batch of {} frames for ({}, {})",
            frames.len(),
            plan.location().latitude,
            plan.location().longitude
        );
        Ok(BatchResult {
            frames,
            metadata: plan.metadata(),
        })
    }
}

/// Compute `frame_count` evenly spaced frames covering `[start, end]`.
pub fn generate_batch(
    location: &GeographicLocation,
    start: NaiveDateTime,
    end: NaiveDateTime,
    frame_count: i64,
) -> ObservationResult<BatchResult> {
    let plan = BatchPlan::new(*location, start, end, frame_count)?;
    ObservationEngine::new().run_batch(&plan)
}

/// Validate and run a caller-supplied request without a cache.
pub fn generate_batch_from_request(request: &BatchRequest) -> ObservationResult<BatchResult> {
    let plan = BatchPlan::from_request(request)?;
    ObservationEngine::new().run_batch(&plan)
}
