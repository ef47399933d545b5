pub mod batch;
pub mod cache;
pub mod calendar;
pub mod observation;
pub mod rise_set;
pub mod stream;

pub use batch::{generate_batch, BatchPlan, BatchRequest, MAX_FRAME_COUNT, MIN_FRAME_COUNT};
pub use cache::{CacheStats, FrameCache};
pub use calendar::{day_of_week, DayOfWeek};
pub use observation::{compute_frame, compute_frame_at, ObservationEngine};
pub use rise_set::{rise_and_set, Body, RiseSet};
pub use stream::{observation_events, StreamOptions};
