//! Data Transfer Objects for the HTTP API.
//!
//! Batch requests and results are the service types themselves; the
//! single-instant endpoints get their own request and response shapes here.

use serde::{Deserialize, Serialize};

pub use crate::models::{BatchResult, CelestialPosition, GeographicLocation, MoonPhase};
pub use crate::services::{BatchRequest, Body, DayOfWeek};

fn default_time() -> String {
    "00:00:00".to_string()
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Date with an optional time of day (defaults to midnight UTC).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateTimeRequest {
    /// Date in ISO format (YYYY-MM-DD)
    pub date: String,
    /// Time in HH:MM:SS format
    #[serde(default = "default_time")]
    pub time: String,
}

/// A single instant at an observer location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstantRequest {
    pub date: String,
    #[serde(default = "default_time")]
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub elevation: f64,
}

impl InstantRequest {
    pub fn location(&self) -> GeographicLocation {
        GeographicLocation {
            latitude: self.latitude,
            longitude: self.longitude,
            elevation: self.elevation,
        }
    }
}

/// Sun or moon position with the instant it was computed for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionResponse {
    #[serde(flatten)]
    pub position: CelestialPosition,
    pub julian_date: f64,
    pub input_datetime: String,
    pub location: GeographicLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoonPhaseResponse {
    #[serde(flatten)]
    pub phase: MoonPhase,
    pub julian_date: f64,
    pub input_datetime: String,
    pub location: GeographicLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiseSetRequest {
    pub date: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub elevation: f64,
    pub body: Body,
}

/// Rise and set times; `null` when the body does not cross the horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiseSetResponse {
    pub body: Body,
    pub date: String,
    pub rise: Option<String>,
    pub set: Option<String>,
    pub location: GeographicLocation,
}
