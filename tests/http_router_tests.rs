//! Router tests driven through `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use skyview::client::SseDecoder;
use skyview::config::ServerConfig;
use skyview::http::{create_router, AppState};
use skyview::models::{BatchResult, StreamEvent};
use skyview::services::{compute_frame_at, ObservationEngine};
use std::time::Duration;

fn app() -> Router {
    create_router(AppState::default())
}

/// Every frame takes 200 ms against a 50 ms per-frame budget.
fn stalled_app() -> Router {
    let config = ServerConfig {
        frame_timeout_ms: 50,
        ..ServerConfig::default()
    };
    let mut state = AppState::new(config);
    state.engine = ObservationEngine::new().with_frame_fn(|datetime, location| {
        std::thread::sleep(Duration::from_millis(200));
        compute_frame_at(datetime, location)
    });
    create_router(state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_batch_endpoint() {
    let request = post_json(
        "/v1/observations/batch",
        json!({
            "latitude": 51.5,
            "longitude": -0.1,
            "start_date": "2026-02-02",
            "end_date": "2026-02-02",
            "frame_count": 48
        }),
    );
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);

    let result: BatchResult = serde_json::from_slice(&body).unwrap();
    assert_eq!(result.frames.len(), 48);
    result.check_invariants().unwrap();

    let raw: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(raw["frames"][0]["datetime"], "2026-02-02T00:00:00");
    assert!(raw["frames"][0]["moon_phase"]["phase_name"].is_string());
}

#[tokio::test]
async fn test_batch_validation_is_400() {
    let request = post_json(
        "/v1/observations/batch",
        json!({
            "latitude": 51.5,
            "longitude": -0.1,
            "start_date": "2026-02-02",
            "end_date": "2026-02-02",
            "frame_count": 1
        }),
    );
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["message"].as_str().unwrap().contains("frame_count"));
}

#[tokio::test]
async fn test_stream_endpoint_events() {
    let uri = "/v1/observations/stream?latitude=51.5&longitude=-0.1\
               &start_date=2026-02-02&end_date=2026-02-02&frame_count=6";
    let (status, body) = send(app(), get(uri)).await;
    assert_eq!(status, StatusCode::OK);

    let mut decoder = SseDecoder::default();
    let events: Vec<StreamEvent> = decoder
        .push(&body)
        .into_iter()
        .map(|m| StreamEvent::from_parts(&m.event, &m.data).unwrap())
        .collect();

    assert_eq!(events.len(), 7);
    assert!(events[..6].iter().all(|e| e.event_name() == "frame"));
    assert_eq!(events[6].event_name(), "metadata");
}

#[tokio::test]
async fn test_stream_validation_before_open() {
    let uri = "/v1/observations/stream?latitude=95&longitude=0\
               &start_date=2026-02-02&end_date=2026-02-02&frame_count=6";
    let (status, body) = send(app(), get(uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["message"].as_str().unwrap().contains("Latitude"));
}

#[tokio::test]
async fn test_sun_position_endpoint() {
    let request = post_json(
        "/v1/sun-position",
        json!({"date": "2026-06-21", "time": "12:00:00", "latitude": 51.5, "longitude": -0.1}),
    );
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["altitude"].as_f64().unwrap() > 55.0);
    assert_eq!(body["is_visible"], true);
    assert_eq!(body["input_datetime"], "2026-06-21T12:00:00");
    assert_eq!(body["location"]["elevation"], 0.0);
}

#[tokio::test]
async fn test_moon_endpoints() {
    let body = json!({"date": "2025-01-13", "time": "22:00:00", "latitude": 40.7, "longitude": -74.0});
    let (status, raw) = send(app(), post_json("/v1/moon-phase", body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let phase: Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(phase["phase_name"], "Full Moon");

    let (status, raw) = send(app(), post_json("/v1/moon-position", body)).await;
    assert_eq!(status, StatusCode::OK);
    let position: Value = serde_json::from_slice(&raw).unwrap();
    let azimuth = position["azimuth"].as_f64().unwrap();
    assert!((0.0..360.0).contains(&azimuth));
}

#[tokio::test]
async fn test_day_of_week_endpoint() {
    let (status, raw) = send(app(), post_json("/v1/day-of-week", json!({"date": "2026-02-01"}))).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(body["day_name"], "Sunday");
    assert_eq!(body["day_of_week"], 0);
    assert_eq!(body["input_datetime"], "2026-02-01T00:00:00");

    let (status, _) = send(app(), post_json("/v1/day-of-week", json!({"date": "02/01/2026"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rise_set_endpoint() {
    let request = post_json(
        "/v1/rise-set",
        json!({"date": "2026-03-20", "latitude": 0.0, "longitude": 0.0, "body": "sun"}),
    );
    let (status, raw) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&raw).unwrap();
    assert!(body["rise"].as_str().unwrap().starts_with("2026-03-20T06:"));
    assert!(body["set"].as_str().unwrap().starts_with("2026-03-20T18:"));
}

#[tokio::test]
async fn test_cached_state_serves_identical_batches() {
    let config = ServerConfig {
        cache_capacity: 1000,
        ..ServerConfig::default()
    };
    let state = AppState::new(config);
    let body = json!({
        "latitude": 51.5, "longitude": -0.1,
        "start_date": "2026-02-02", "end_date": "2026-02-02", "frame_count": 10
    });

    let (_, first) = send(create_router(state.clone()), post_json("/v1/observations/batch", body.clone())).await;
    let (_, second) = send(create_router(state.clone()), post_json("/v1/observations/batch", body)).await;
    assert_eq!(first, second);

    let stats = state.engine.cache().unwrap().stats();
    assert_eq!(stats.entries, 10);
    assert_eq!(stats.hits, 10);
}

#[tokio::test]
async fn test_stalled_batch_is_504() {
    let request = post_json(
        "/v1/observations/batch",
        json!({
            "latitude": 51.5, "longitude": -0.1,
            "start_date": "2026-02-02", "end_date": "2026-02-02", "frame_count": 2
        }),
    );
    let (status, body) = send(stalled_app(), request).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["code"], "TIMEOUT");
}

#[tokio::test]
async fn test_stalled_stream_ends_with_single_timeout_event() {
    let uri = "/v1/observations/stream?latitude=51.5&longitude=-0.1\
               &start_date=2026-02-02&end_date=2026-02-02&frame_count=6";
    let (status, body) = send(stalled_app(), get(uri)).await;
    assert_eq!(status, StatusCode::OK);

    let events: Vec<StreamEvent> = SseDecoder::default()
        .push(&body)
        .into_iter()
        .map(|m| StreamEvent::from_parts(&m.event, &m.data).unwrap())
        .collect();
    assert_eq!(events.len(), 1, "{:?}", events);
    match &events[0] {
        StreamEvent::Error(failure) => assert_eq!(failure.code, "TIMEOUT"),
        other => panic!("expected timeout error, got {:?}", other),
    }
}
