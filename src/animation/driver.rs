//! Playback state machine.
//!
//! ```text
//!             play()               pause()
//!   STOPPED ─────────► PLAYING ◄──────────► PAUSED
//!      ▲                  │      toggle()      │
//!      └──────────────────┴────────────────────┘
//!                       reset()
//! ```
//!
//! The host calls [`AnimationDriver::tick`] once per display refresh with a
//! monotonic clock in milliseconds. Playback loops forever.

use crate::models::{BatchResult, ObservationFrame};

use super::interval::{frame_interval, IntervalWarning, DEFAULT_FRAME_INTERVAL_MS};
use super::projection::{SceneFrame, ViewMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnimationError {
    #[error("Speed multiplier must be a positive finite number, got {0}")]
    InvalidSpeed(f64),
}

/// Drawing backend. Kept free of any graphics API so the driver can run
/// headless.
pub trait SceneRenderer {
    fn draw(&mut self, scene: &SceneFrame);

    fn resize(&mut self, width: u32, height: u32);

    /// Free GPU or window resources; called when the data is cleared.
    fn release(&mut self);
}

pub struct AnimationDriver<R: SceneRenderer> {
    renderer: R,
    frames: Vec<ObservationFrame>,
    current_index: usize,
    state: PlaybackState,
    speed: f64,
    view_mode: ViewMode,
    frame_interval_ms: f64,
    warning: Option<IntervalWarning>,
    /// Clock value of the last advance; None until the first tick after play
    last_advance_ms: Option<f64>,
}

impl<R: SceneRenderer> AnimationDriver<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            frames: Vec::new(),
            current_index: 0,
            state: PlaybackState::Stopped,
            speed: 1.0,
            view_mode: ViewMode::default(),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            warning: None,
            last_advance_ms: None,
        }
    }

    /// Load frames, stop at the first one and draw it. Returns the
    /// data-quality warning if the interval fell back to the default.
    pub fn load(&mut self, batch: &BatchResult) -> Option<IntervalWarning> {
        self.load_frames(batch.frames.clone())
    }

    pub fn load_frames(&mut self, frames: Vec<ObservationFrame>) -> Option<IntervalWarning> {
        let interval = frame_interval(&frames);
        self.frames = frames;
        self.frame_interval_ms = interval.ms;
        self.warning = interval.warning;
        self.current_index = 0;
        self.state = PlaybackState::Stopped;
        self.last_advance_ms = None;
        log::debug!(
            "loaded {} frames, interval {} ms",
            self.frames.len(),
            self.frame_interval_ms
        );
        self.render();
        self.warning
    }

    /// Drop the frames and release renderer resources.
    pub fn clear(&mut self) {
        self.renderer.release();
        self.frames = Vec::new();
        self.current_index = 0;
        self.state = PlaybackState::Stopped;
        self.frame_interval_ms = DEFAULT_FRAME_INTERVAL_MS;
        self.warning = None;
        self.last_advance_ms = None;
    }

    /// STOPPED/PAUSED → PLAYING. No effect without frames.
    pub fn play(&mut self) {
        if self.frames.is_empty() || self.state == PlaybackState::Playing {
            return;
        }
        self.state = PlaybackState::Playing;
        self.last_advance_ms = None;
    }

    /// PLAYING → PAUSED.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Play/pause button.
    pub fn toggle_playback(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Stopped | PlaybackState::Paused => self.play(),
        }
    }

    /// Any → STOPPED at the first frame.
    pub fn reset(&mut self) {
        self.state = PlaybackState::Stopped;
        self.current_index = 0;
        self.last_advance_ms = None;
        self.render();
    }

    /// Takes effect on the next tick.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), AnimationError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(AnimationError::InvalidSpeed(speed));
        }
        self.speed = speed;
        Ok(())
    }

    /// Switch projection and redraw the current frame immediately.
    pub fn toggle_view(&mut self) -> ViewMode {
        self.set_view_mode(self.view_mode.toggled());
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        self.render();
    }

    /// Safe during playback; does not change the playback state.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
        self.render();
    }

    /// Advance if playing and enough time has passed. Returns true when
    /// the frame changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if self.state != PlaybackState::Playing || self.frames.is_empty() {
            return false;
        }
        let Some(last) = self.last_advance_ms else {
            self.last_advance_ms = Some(now_ms);
            return false;
        };
        if now_ms - last < self.effective_interval_ms() {
            return false;
        }

        self.current_index = (self.current_index + 1) % self.frames.len();
        self.last_advance_ms = Some(now_ms);
        self.render();
        true
    }

    /// Interval between advances at the current speed.
    pub fn effective_interval_ms(&self) -> f64 {
        self.frame_interval_ms / self.speed
    }

    pub fn scene(&self) -> Option<SceneFrame> {
        self.frames
            .get(self.current_index)
            .map(|frame| SceneFrame::new(self.current_index, frame, self.view_mode))
    }

    fn render(&mut self) {
        if let Some(scene) = self.scene() {
            self.renderer.draw(&scene);
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_frame(&self) -> Option<&ObservationFrame> {
        self.frames.get(self.current_index)
    }

    pub fn frames(&self) -> &[ObservationFrame] {
        &self.frames
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn frame_interval_ms(&self) -> f64 {
        self.frame_interval_ms
    }

    pub fn warning(&self) -> Option<IntervalWarning> {
        self.warning
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
