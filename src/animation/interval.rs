//! Real-time frame interval derived from the data's own spacing.

use std::fmt;

use crate::models::ObservationFrame;

/// Playback milliseconds per hour of data at 1x speed.
pub const MS_PER_DATA_HOUR: f64 = 1000.0;
/// Floor for densely sampled data.
pub const MIN_FRAME_INTERVAL_MS: f64 = 50.0;
/// Used when the spacing cannot be measured.
pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 1000.0;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Data-quality conditions that force the default interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalWarning {
    /// Fewer than two frames loaded
    TooFewFrames,
    /// The first two frames are not strictly increasing in time
    NonIncreasingTimestamps,
}

impl fmt::Display for IntervalWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalWarning::TooFewFrames => {
                f.write_str("fewer than two frames, using the default frame interval")
            }
            IntervalWarning::NonIncreasingTimestamps => f.write_str(
                "first two frames are not in increasing time order, using the default frame interval",
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInterval {
    pub ms: f64,
    pub warning: Option<IntervalWarning>,
}

impl FrameInterval {
    fn fallback(warning: IntervalWarning) -> Self {
        log::warn!("{}", warning);
        Self {
            ms: DEFAULT_FRAME_INTERVAL_MS,
            warning: Some(warning),
        }
    }
}

/// Interval between frames at 1x speed, from the first two frames.
pub fn frame_interval(frames: &[ObservationFrame]) -> FrameInterval {
    let [first, second, ..] = frames else {
        return FrameInterval::fallback(IntervalWarning::TooFewFrames);
    };
    let delta_ms = (second.datetime - first.datetime).num_milliseconds();
    if delta_ms <= 0 {
        return FrameInterval::fallback(IntervalWarning::NonIncreasingTimestamps);
    }

    let hours = delta_ms as f64 / MS_PER_HOUR;
    FrameInterval {
        ms: (hours * MS_PER_DATA_HOUR).max(MIN_FRAME_INTERVAL_MS),
        warning: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_timestamp, CelestialPosition, MoonPhase, PhaseName};

    fn frame(ts: &str) -> ObservationFrame {
        ObservationFrame {
            datetime: parse_timestamp(ts).unwrap(),
            sun: CelestialPosition::from_horizontal(0.0, 0.0),
            moon: CelestialPosition::from_horizontal(0.0, 0.0),
            moon_phase: MoonPhase {
                illumination: 0.0,
                phase_angle: 0.0,
                phase_name: PhaseName::NewMoon,
            },
        }
    }

    fn interval(a: &str, b: &str) -> FrameInterval {
        frame_interval(&[frame(a), frame(b)])
    }

    #[test]
    fn test_one_hour_is_one_second() {
        let i = interval("2026-02-02T00:00:00", "2026-02-02T01:00:00");
        assert_eq!(i.ms, 1000.0);
        assert_eq!(i.warning, None);
    }

    #[test]
    fn test_half_hour() {
        assert_eq!(interval("2026-02-02T00:00:00", "2026-02-02T00:30:00").ms, 500.0);
    }

    #[test]
    fn test_one_minute_clamps_to_floor() {
        assert_eq!(interval("2026-02-02T00:00:00", "2026-02-02T00:01:00").ms, 50.0);
    }

    #[test]
    fn test_duplicate_and_reversed_fall_back() {
        let dup = interval("2026-02-02T00:00:00", "2026-02-02T00:00:00");
        assert_eq!(dup.ms, 1000.0);
        assert_eq!(dup.warning, Some(IntervalWarning::NonIncreasingTimestamps));

        let rev = interval("2026-02-02T01:00:00", "2026-02-02T00:00:00");
        assert_eq!(rev.ms, 1000.0);
        assert!(rev.warning.is_some());
    }

    #[test]
    fn test_too_few_frames() {
        assert_eq!(
            frame_interval(&[]).warning,
            Some(IntervalWarning::TooFewFrames)
        );
        let single = frame_interval(&[frame("2026-02-02T00:00:00")]);
        assert_eq!(single.ms, DEFAULT_FRAME_INTERVAL_MS);
        assert_eq!(single.warning, Some(IntervalWarning::TooFewFrames));
    }
}
