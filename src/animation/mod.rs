//! Animation Driver: plays a loaded batch back in real time.
//!
//! One hour of observation data plays in one second at 1x speed. The
//! driver owns the playback state machine and hands projected scenes to a
//! [`SceneRenderer`]; it never draws anything itself.

pub mod driver;
pub mod interval;
pub mod projection;

pub use driver::{AnimationDriver, AnimationError, PlaybackState, SceneRenderer};
pub use interval::{frame_interval, FrameInterval, IntervalWarning};
pub use projection::{project, ProjectedBody, SceneFrame, ViewMode};
