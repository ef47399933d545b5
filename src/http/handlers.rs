//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for the computation.

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use chrono::NaiveDate;
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use super::dto::{
    BatchRequest, BatchResult, DateTimeRequest, DayOfWeek, HealthResponse, InstantRequest,
    MoonPhaseResponse, PositionResponse, RiseSetRequest, RiseSetResponse,
};
use super::error::{ApiError, AppError};
use super::state::AppState;
use crate::error::ObservationError;
use crate::models::{format_timestamp, parse_date_time, JulianDate, StreamEvent};
use crate::services::{self, observation, BatchPlan};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check() -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

// =============================================================================
// Batch observations
// =============================================================================

/// POST /v1/observations/batch
///
/// Compute every frame and return them in one response. The whole batch
/// shares one budget; exceeding it answers 504.
pub async fn batch_observations(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> HandlerResult<BatchResult> {
    let plan = BatchPlan::from_request(&request)?;
    let budget = state.batch_timeout(plan.frame_count());
    let engine = state.engine.clone();

    let task = tokio::task::spawn_blocking(move || engine.run_batch(&plan));
    let result = tokio::time::timeout(budget, task)
        .await
        .map_err(|_| {
            warn!(budget_ms = budget.as_millis() as u64, "batch timed out");
            ObservationError::Timeout(budget.as_millis() as u64)
        })?
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    info!(frames = result.frames.len(), "batch computed");
    Ok(Json(result))
}

/// GET /v1/observations/stream
///
/// Stream frames via Server-Sent Events: one `frame` event per frame in
/// timestamp order, then one `metadata` event. A failure ends the stream
/// with a single `error` event. Invalid parameters are rejected with 400
/// before the stream opens.
pub async fn stream_observations(
    State(state): State<AppState>,
    Query(request): Query<BatchRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let plan = BatchPlan::from_request(&request)?;
    let stream_id = Uuid::new_v4();
    let span = info_span!("observation_stream", %stream_id, frames = plan.frame_count());
    info!(parent: &span, "stream opened");

    let mut events = Box::pin(services::observation_events(
        state.engine.clone(),
        plan,
        state.stream_options(),
    ));

    let stream = async_stream::stream! {
        let mut guard = StreamGuard { span, sent: 0, finished: false };
        while let Some(event) = events.next().await {
            match &event {
                StreamEvent::Frame(_) => guard.sent += 1,
                StreamEvent::Error(failure) => {
                    warn!(parent: &guard.span, code = %failure.code, "stream failed: {}", failure.message);
                }
                StreamEvent::Metadata(_) => {}
            }
            yield Ok(to_sse_event(&event));
        }
        guard.finished = true;
    };

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(state.config.keep_alive())
            .text("keep-alive"),
    ))
}

/// Logs how a stream ended, including client disconnects.
struct StreamGuard {
    span: tracing::Span,
    sent: usize,
    finished: bool,
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        if self.finished {
            info!(parent: &self.span, frames = self.sent, "stream finished");
        } else {
            info!(parent: &self.span, frames = self.sent, "client disconnected, stream cancelled");
        }
    }
}

fn to_sse_event(event: &StreamEvent) -> Event {
    match event.payload_json() {
        Ok(data) => Event::default().event(event.event_name()).data(data),
        Err(e) => {
            let error = ApiError::new("INTERNAL_ERROR", format!("Failed to encode event: {}", e));
            Event::default()
                .event(StreamEvent::ERROR)
                .data(serde_json::to_string(&error).unwrap_or_default())
        }
    }
}

// =============================================================================
// Single-instant queries
// =============================================================================

/// POST /v1/sun-position
pub async fn sun_position(Json(request): Json<InstantRequest>) -> HandlerResult<PositionResponse> {
    let datetime = parse_date_time(&request.date, &request.time)?;
    let location = request.location();
    let position = observation::sun_position(datetime, &location)?;

    Ok(Json(PositionResponse {
        position,
        julian_date: JulianDate::from_datetime(datetime).value(),
        input_datetime: format_timestamp(&datetime),
        location,
    }))
}

/// POST /v1/moon-position
pub async fn moon_position(Json(request): Json<InstantRequest>) -> HandlerResult<PositionResponse> {
    let datetime = parse_date_time(&request.date, &request.time)?;
    let location = request.location();
    let position = observation::moon_position(datetime, &location)?;

    Ok(Json(PositionResponse {
        position,
        julian_date: JulianDate::from_datetime(datetime).value(),
        input_datetime: format_timestamp(&datetime),
        location,
    }))
}

/// POST /v1/moon-phase
pub async fn moon_phase(Json(request): Json<InstantRequest>) -> HandlerResult<MoonPhaseResponse> {
    let datetime = parse_date_time(&request.date, &request.time)?;
    let location = request.location();
    let phase = observation::moon_phase_at(datetime, &location)?;

    Ok(Json(MoonPhaseResponse {
        phase,
        julian_date: JulianDate::from_datetime(datetime).value(),
        input_datetime: format_timestamp(&datetime),
        location,
    }))
}

/// POST /v1/day-of-week
pub async fn day_of_week(Json(request): Json<DateTimeRequest>) -> HandlerResult<DayOfWeek> {
    let datetime = parse_date_time(&request.date, &request.time)?;
    Ok(Json(services::day_of_week(datetime)))
}

/// POST /v1/rise-set
///
/// First rise and set of the sun or moon during the given UTC day.
pub async fn rise_set(Json(request): Json<RiseSetRequest>) -> HandlerResult<RiseSetResponse> {
    let date = NaiveDate::parse_from_str(request.date.trim(), "%Y-%m-%d")
        .map_err(|e| ObservationError::parse(format!("date '{}': {}", request.date, e)))?;
    let location = crate::models::GeographicLocation {
        latitude: request.latitude,
        longitude: request.longitude,
        elevation: request.elevation,
    };

    let body = request.body;
    let times = tokio::task::spawn_blocking(move || services::rise_and_set(body, date, &location))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(RiseSetResponse {
        body,
        date: date.format("%Y-%m-%d").to_string(),
        rise: times.rise.as_ref().map(format_timestamp),
        set: times.set.as_ref().map(format_timestamp),
        location,
    }))
}
