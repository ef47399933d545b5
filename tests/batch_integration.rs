mod support;

use futures::StreamExt;
use skyview::models::{parse_timestamp, StreamEvent};
use skyview::services::{
    batch::generate_batch_from_request, observation_events, BatchPlan, ObservationEngine,
    StreamOptions,
};
use skyview::ObservationError;
use support::london_request;

#[test]
fn test_london_day_in_48_frames() {
    let result = generate_batch_from_request(&london_request(48)).unwrap();

    assert_eq!(result.frames.len(), 48);
    assert_eq!(result.metadata.frame_count, 48);
    assert_eq!(
        result.frames[0].datetime,
        parse_timestamp("2026-02-02T00:00:00").unwrap()
    );
    assert_eq!(
        result.frames[47].datetime,
        parse_timestamp("2026-02-02T23:59:59").unwrap()
    );
    assert!((result.metadata.time_span_hours - 24.0).abs() < 0.001);
    result.check_invariants().unwrap();

    // Sun is down at midnight and up around noon in February
    assert!(!result.frames[0].sun.is_visible);
    assert!(result.frames.iter().any(|f| f.sun.is_visible));
}

#[test]
fn test_frame_count_validation() {
    for count in [1, 10_001] {
        let err = generate_batch_from_request(&london_request(count)).unwrap_err();
        assert!(
            matches!(err, ObservationError::InvalidInput(_)),
            "count {} gave {:?}",
            count,
            err
        );
    }
}

#[test]
fn test_end_before_start() {
    let mut request = london_request(10);
    request.end_date = "2026-02-01".to_string();
    let err = generate_batch_from_request(&request).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_bad_coordinates() {
    let mut request = london_request(10);
    request.latitude = -91.0;
    let err = generate_batch_from_request(&request).unwrap_err();
    assert!(err.to_string().contains("Latitude"));

    let mut request = london_request(10);
    request.longitude = 180.5;
    let err = generate_batch_from_request(&request).unwrap_err();
    assert!(err.to_string().contains("Longitude"));
}

#[tokio::test]
async fn test_streaming_matches_one_shot() {
    let request = london_request(48);
    let one_shot = generate_batch_from_request(&request).unwrap();

    let plan = BatchPlan::from_request(&request).unwrap();
    let events: Vec<StreamEvent> =
        observation_events(ObservationEngine::new(), plan, StreamOptions::default())
            .collect()
            .await;

    let frames: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Frame(f) => Some(f.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(frames, one_shot.frames);

    let metadata: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Metadata(m) => Some(m.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(metadata, vec![one_shot.metadata]);
}
