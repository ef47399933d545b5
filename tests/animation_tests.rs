//! Playback of computed batches.

mod support;

use skyview::animation::{AnimationDriver, PlaybackState, SceneFrame, SceneRenderer, ViewMode};
use skyview::services::batch::generate_batch_from_request;
use support::london_request;

#[derive(Default)]
struct CountingRenderer {
    draws: usize,
    last: Option<SceneFrame>,
}

impl SceneRenderer for CountingRenderer {
    fn draw(&mut self, scene: &SceneFrame) {
        self.draws += 1;
        self.last = Some(scene.clone());
    }

    fn resize(&mut self, _width: u32, _height: u32) {}

    fn release(&mut self) {
        self.last = None;
    }
}

#[test]
fn test_half_hourly_batch_plays_at_half_second() {
    // 49 frames over 24h are exactly 30 minutes apart
    let mut request = london_request(49);
    request.end_date = "2026-02-03".to_string();
    request.end_time = "00:00:00".to_string();
    let batch = generate_batch_from_request(&request).unwrap();

    let mut driver = AnimationDriver::new(CountingRenderer::default());
    assert_eq!(driver.load(&batch), None);
    assert_eq!(driver.frame_interval_ms(), 500.0);

    driver.play();
    driver.tick(0.0);
    let mut now = 0.0;
    for _ in 0..49 {
        now += 500.0;
        assert!(driver.tick(now));
    }
    // One full loop lands back on the first frame
    assert_eq!(driver.current_index(), 0);
    assert_eq!(driver.state(), PlaybackState::Playing);
}

#[test]
fn test_dense_batch_clamps_interval() {
    let mut request = london_request(100);
    request.end_time = "01:00:00".to_string();
    let batch = generate_batch_from_request(&request).unwrap();

    let mut driver = AnimationDriver::new(CountingRenderer::default());
    driver.load(&batch);
    assert_eq!(driver.frame_interval_ms(), 50.0);
}

#[test]
fn test_sky_mode_hides_set_bodies() {
    let batch = generate_batch_from_request(&london_request(48)).unwrap();
    let mut driver = AnimationDriver::new(CountingRenderer::default());
    driver.load(&batch);

    // Midnight in February: the sun is down
    driver.set_view_mode(ViewMode::Sky);
    let scene = driver.renderer().last.clone().unwrap();
    assert!(!scene.sun.visible);
    assert!(scene.sun.position.y.abs() < 1e-9);

    driver.toggle_view();
    let scene = driver.renderer().last.clone().unwrap();
    assert_eq!(scene.mode, ViewMode::Orbital);
    assert!(scene.sun.visible);
    assert!(scene.sun.position.y < 0.0);
}

#[test]
fn test_new_query_clears_driver() {
    let batch = generate_batch_from_request(&london_request(10)).unwrap();
    let mut driver = AnimationDriver::new(CountingRenderer::default());
    driver.load(&batch);
    driver.play();
    driver.clear();

    assert!(driver.frames().is_empty());
    assert!(driver.renderer().last.is_none());
    assert!(!driver.tick(1_000_000.0));
}
