//! Observation frames and the batch containers built from them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::location::GeographicLocation;

/// Horizontal position of a body as seen by the observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CelestialPosition {
    /// Degrees above (positive) or below (negative) the horizon, [-90, 90]
    pub altitude: f64,
    /// Degrees clockwise from north, [0, 360)
    pub azimuth: f64,
    /// True iff altitude > 0
    pub is_visible: bool,
}

impl CelestialPosition {
    pub fn from_horizontal(altitude: f64, azimuth: f64) -> Self {
        Self {
            altitude,
            azimuth,
            is_visible: altitude > 0.0,
        }
    }
}

/// Named lunar phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseName {
    #[serde(rename = "New Moon")]
    NewMoon,
    #[serde(rename = "Waxing Crescent")]
    WaxingCrescent,
    #[serde(rename = "First Quarter")]
    FirstQuarter,
    #[serde(rename = "Waxing Gibbous")]
    WaxingGibbous,
    #[serde(rename = "Full Moon")]
    FullMoon,
    #[serde(rename = "Waning Gibbous")]
    WaningGibbous,
    #[serde(rename = "Last Quarter")]
    LastQuarter,
    #[serde(rename = "Waning Crescent")]
    WaningCrescent,
}

impl PhaseName {
    /// Width of each phase bucket in degrees.
    pub const BUCKET_WIDTH: f64 = 45.0;

    const ORDER: [PhaseName; 8] = [
        PhaseName::NewMoon,
        PhaseName::WaxingCrescent,
        PhaseName::FirstQuarter,
        PhaseName::WaxingGibbous,
        PhaseName::FullMoon,
        PhaseName::WaningGibbous,
        PhaseName::LastQuarter,
        PhaseName::WaningCrescent,
    ];

    /// Bucket a phase angle (degrees, any range) into one of the eight names.
    ///
    /// Buckets are closed-open and centred on the principal phases, so
    /// New Moon covers [337.5, 360) and [0, 22.5), First Quarter covers
    /// [67.5, 112.5), and so on. A value exactly on a boundary belongs to
    /// the later bucket.
    pub fn from_phase_angle(phase_angle: f64) -> Self {
        // Count half-buckets without shifting the angle first: adding the
        // offset would round values just below a boundary onto it.
        let angle = phase_angle.rem_euclid(360.0);
        let half_buckets = (angle / (Self::BUCKET_WIDTH / 2.0)).floor() as usize;
        Self::ORDER[((half_buckets + 1) / 2) % Self::ORDER.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseName::NewMoon => "New Moon",
            PhaseName::WaxingCrescent => "Waxing Crescent",
            PhaseName::FirstQuarter => "First Quarter",
            PhaseName::WaxingGibbous => "Waxing Gibbous",
            PhaseName::FullMoon => "Full Moon",
            PhaseName::WaningGibbous => "Waning Gibbous",
            PhaseName::LastQuarter => "Last Quarter",
            PhaseName::WaningCrescent => "Waning Crescent",
        }
    }
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lunar phase at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoonPhase {
    /// Fraction of the disc lit, [0, 1]
    pub illumination: f64,
    /// Moon minus sun ecliptic longitude, [0, 360); 0-180 waxing, 180-360 waning
    pub phase_angle: f64,
    pub phase_name: PhaseName,
}

/// One computed observation: sun, moon and lunar phase at a single instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationFrame {
    /// UTC instant of the observation
    pub datetime: NaiveDateTime,
    pub sun: CelestialPosition,
    pub moon: CelestialPosition,
    pub moon_phase: MoonPhase,
}

/// Run metadata describing a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMetadata {
    pub location: GeographicLocation,
    pub frame_count: usize,
    pub start_datetime: NaiveDateTime,
    pub end_datetime: NaiveDateTime,
    pub time_span_hours: f64,
}

/// Ordered frames plus the metadata of the run that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub frames: Vec<ObservationFrame>,
    pub metadata: BatchMetadata,
}

impl BatchResult {
    /// Check the batch invariants: the frame count matches the metadata and
    /// timestamps are strictly increasing.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.frames.len() != self.metadata.frame_count {
            return Err(format!(
                "expected {} frames, got {}",
                self.metadata.frame_count,
                self.frames.len()
            ));
        }
        if let Some(pair) = self
            .frames
            .windows(2)
            .find(|pair| pair[0].datetime >= pair[1].datetime)
        {
            return Err(format!(
                "frames out of order: {} is not before {}",
                pair[0].datetime, pair[1].datetime
            ));
        }
        Ok(())
    }
}

/// Failure payload carried by an error event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamFailure {
    pub code: String,
    pub message: String,
}

/// Event emitted by the streaming transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum StreamEvent {
    Frame(ObservationFrame),
    Metadata(BatchMetadata),
    Error(StreamFailure),
}

impl StreamEvent {
    pub const FRAME: &'static str = "frame";
    pub const METADATA: &'static str = "metadata";
    pub const ERROR: &'static str = "error";

    /// SSE event name for this variant.
    pub fn event_name(&self) -> &'static str {
        match self {
            StreamEvent::Frame(_) => Self::FRAME,
            StreamEvent::Metadata(_) => Self::METADATA,
            StreamEvent::Error(_) => Self::ERROR,
        }
    }

    /// JSON payload for the SSE data field.
    pub fn payload_json(&self) -> serde_json::Result<String> {
        match self {
            StreamEvent::Frame(frame) => serde_json::to_string(frame),
            StreamEvent::Metadata(metadata) => serde_json::to_string(metadata),
            StreamEvent::Error(failure) => serde_json::to_string(failure),
        }
    }

    /// Rebuild an event from an SSE event name and its data payload.
    pub fn from_parts(event: &str, data: &str) -> Result<Self, String> {
        let parsed = match event {
            Self::FRAME => serde_json::from_str(data).map(StreamEvent::Frame),
            Self::METADATA => serde_json::from_str(data).map(StreamEvent::Metadata),
            Self::ERROR => serde_json::from_str(data).map(StreamEvent::Error),
            other => return Err(format!("unknown event type '{}'", other)),
        };
        parsed.map_err(|e| format!("malformed '{}' event: {}", event, e))
    }
}
