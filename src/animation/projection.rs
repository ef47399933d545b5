//! Horizontal coordinates to scene positions for the two view modes.
//!
//! Scene axes: +x east, +y up, -z north (observer at the origin).

use chrono::NaiveDateTime;
use nalgebra::Vector3;

use crate::models::{CelestialPosition, MoonPhase, ObservationFrame};

/// Distance of the bodies from the observer in orbital mode.
pub const ORBIT_RADIUS: f64 = 5.0;
/// Radius of the sky hemisphere in sky mode.
pub const SKY_DOME_RADIUS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// 3D view with the bodies on a sphere around the observer
    #[default]
    Orbital,
    /// Sky dome seen from the observer; the horizon is the floor
    Sky,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Orbital => ViewMode::Sky,
            ViewMode::Sky => ViewMode::Orbital,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedBody {
    pub position: Vector3<f64>,
    /// Whether the renderer should draw the body
    pub visible: bool,
}

/// A frame ready for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    pub index: usize,
    pub datetime: NaiveDateTime,
    pub mode: ViewMode,
    pub sun: ProjectedBody,
    pub moon: ProjectedBody,
    pub moon_phase: MoonPhase,
}

impl SceneFrame {
    pub fn new(index: usize, frame: &ObservationFrame, mode: ViewMode) -> Self {
        Self {
            index,
            datetime: frame.datetime,
            mode,
            sun: project(&frame.sun, mode),
            moon: project(&frame.moon, mode),
            moon_phase: frame.moon_phase,
        }
    }
}

fn spherical(radius: f64, altitude_deg: f64, azimuth_deg: f64) -> Vector3<f64> {
    let alt = altitude_deg.to_radians();
    let az = azimuth_deg.to_radians();
    Vector3::new(
        radius * alt.cos() * az.sin(),
        radius * alt.sin(),
        -radius * alt.cos() * az.cos(),
    )
}

/// Project a body for the given mode.
///
/// Orbital mode always renders the body at its true altitude. Sky mode
/// pins below-horizon bodies to the horizon ring at their true azimuth and
/// leaves the render decision to `is_visible`, so toggling visibility needs
/// no recomputation.
pub fn project(position: &CelestialPosition, mode: ViewMode) -> ProjectedBody {
    match mode {
        ViewMode::Orbital => ProjectedBody {
            position: spherical(ORBIT_RADIUS, position.altitude, position.azimuth),
            visible: true,
        },
        ViewMode::Sky => ProjectedBody {
            position: spherical(SKY_DOME_RADIUS, position.altitude.max(0.0), position.azimuth),
            visible: position.is_visible,
        },
    }
}
