//! Observation Engine: sun, moon and lunar phase for one instant.
//!
//! All three results come out of a single [`ObservationContext`]; the phase
//! is derived from the same solar and lunar ecliptic positions that were
//! used for the horizontal coordinates.

use chrono::NaiveDateTime;
use std::sync::Arc;

use super::cache::FrameCache;
use crate::ephemeris::{moon, normalize_degrees, sun, EclipticPosition, ObservationContext};
use crate::error::{ObservationError, ObservationResult};
use crate::models::{
    parse_timestamp, CelestialPosition, GeographicLocation, MoonPhase, ObservationFrame, PhaseName,
};

/// Compute a frame from an ISO-8601 timestamp string.
pub fn compute_frame(
    timestamp: &str,
    location: &GeographicLocation,
) -> ObservationResult<ObservationFrame> {
    let datetime = parse_timestamp(timestamp)?;
    compute_frame_at(datetime, location)
}

/// Compute a frame for an already parsed UTC instant.
pub fn compute_frame_at(
    datetime: NaiveDateTime,
    location: &GeographicLocation,
) -> ObservationResult<ObservationFrame> {
    location.validate()?;
    observe(datetime, location)
}

/// Frame computation without input validation. Callers validate the
/// location once per request.
pub(crate) fn observe(
    datetime: NaiveDateTime,
    location: &GeographicLocation,
) -> ObservationResult<ObservationFrame> {
    let ctx = ObservationContext::new(datetime, location);

    let sun_ecliptic = sun::position(&ctx);
    let moon_ecliptic = moon::position(&ctx);

    let frame = ObservationFrame {
        datetime,
        sun: horizontal(&ctx, &sun_ecliptic),
        moon: horizontal(&ctx, &moon_ecliptic),
        moon_phase: moon_phase(&sun_ecliptic, &moon_ecliptic),
    };
    ensure_finite(&frame)?;
    Ok(frame)
}

/// Sun position only.
pub fn sun_position(
    datetime: NaiveDateTime,
    location: &GeographicLocation,
) -> ObservationResult<CelestialPosition> {
    location.validate()?;
    let ctx = ObservationContext::new(datetime, location);
    let position = horizontal(&ctx, &sun::position(&ctx));
    ensure_finite_position("sun", &position)?;
    Ok(position)
}

/// Moon position only.
pub fn moon_position(
    datetime: NaiveDateTime,
    location: &GeographicLocation,
) -> ObservationResult<CelestialPosition> {
    location.validate()?;
    let ctx = ObservationContext::new(datetime, location);
    let position = horizontal(&ctx, &moon::position(&ctx));
    ensure_finite_position("moon", &position)?;
    Ok(position)
}

/// Lunar phase only. Location does not change the phase but is validated
/// so every single-instant query rejects the same inputs.
pub fn moon_phase_at(
    datetime: NaiveDateTime,
    location: &GeographicLocation,
) -> ObservationResult<MoonPhase> {
    location.validate()?;
    let ctx = ObservationContext::new(datetime, location);
    let phase = moon_phase(&sun::position(&ctx), &moon::position(&ctx));
    if !phase.illumination.is_finite() || !phase.phase_angle.is_finite() {
        return Err(ObservationError::computation("moon phase is not finite"));
    }
    Ok(phase)
}

/// Phase from the Sun's and Moon's apparent ecliptic positions.
pub fn moon_phase(sun: &EclipticPosition, moon: &EclipticPosition) -> MoonPhase {
    let elongation = sun.separation(moon).to_radians();
    let illumination = (0.5 * (1.0 - elongation.cos())).clamp(0.0, 1.0);
    let phase_angle = normalize_degrees(moon.longitude - sun.longitude);
    MoonPhase {
        illumination,
        phase_angle,
        phase_name: PhaseName::from_phase_angle(phase_angle),
    }
}

fn horizontal(ctx: &ObservationContext, ecliptic: &EclipticPosition) -> CelestialPosition {
    ctx.to_horizontal(&ctx.to_equatorial(ecliptic))
}

fn ensure_finite_position(body: &str, position: &CelestialPosition) -> ObservationResult<()> {
    if position.altitude.is_finite() && position.azimuth.is_finite() {
        Ok(())
    } else {
        Err(ObservationError::computation(format!(
            "{} position is not finite (alt={}, az={})",
            body, position.altitude, position.azimuth
        )))
    }
}

fn ensure_finite(frame: &ObservationFrame) -> ObservationResult<()> {
    ensure_finite_position("sun", &frame.sun)?;
    ensure_finite_position("moon", &frame.moon)?;
    if !frame.moon_phase.illumination.is_finite() || !frame.moon_phase.phase_angle.is_finite() {
        return Err(ObservationError::computation(format!(
            "moon phase is not finite at {}",
            frame.datetime
        )));
    }
    Ok(())
}

/// Computes one frame for an already validated location.
pub type FrameFn =
    dyn Fn(NaiveDateTime, &GeographicLocation) -> ObservationResult<ObservationFrame> + Send + Sync;

/// Frame computation with an optional shared cache.
///
/// Cloning is cheap; clones share the cache and the frame function.
#[derive(Clone)]
pub struct ObservationEngine {
    cache: Option<Arc<FrameCache>>,
    compute: Arc<FrameFn>,
}

impl Default for ObservationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservationEngine {
    pub fn new() -> Self {
        Self {
            cache: None,
            compute: Arc::new(observe),
        }
    }

    pub fn with_cache(cache: Arc<FrameCache>) -> Self {
        Self {
            cache: Some(cache),
            ..Self::new()
        }
    }

    /// Replace the ephemeris with another frame source, e.g. an
    /// instrumented or precomputed one. The cache, if any, is kept.
    pub fn with_frame_fn<F>(mut self, compute: F) -> Self
    where
        F: Fn(NaiveDateTime, &GeographicLocation) -> ObservationResult<ObservationFrame>
            + Send
            + Sync
            + 'static,
    {
        self.compute = Arc::new(compute);
        self
    }

    pub fn cache(&self) -> Option<&Arc<FrameCache>> {
        self.cache.as_ref()
    }

    /// Compute (or fetch) the frame for an instant. The location must have
    /// been validated by the caller.
    pub fn frame(
        &self,
        datetime: NaiveDateTime,
        location: &GeographicLocation,
    ) -> ObservationResult<ObservationFrame> {
        let Some(cache) = &self.cache else {
            return (self.compute)(datetime, location);
        };
        if let Some(frame) = cache.get(location, &datetime) {
            return Ok(frame);
        }
        let frame = (self.compute)(datetime, location)?;
        cache.insert(location, &frame);
        Ok(frame)
    }
}
