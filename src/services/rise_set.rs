//! Rise and set times for the Sun and Moon over one UTC day.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ephemeris::{moon, sun, ObservationContext};
use crate::error::{ObservationError, ObservationResult};
use crate::models::GeographicLocation;

/// Sampling step for bracketing horizon crossings (seconds).
const SCAN_STEP_SECS: i64 = 6 * 60;
const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Sun,
    Moon,
}

impl Body {
    /// Altitude of the body's centre at the visible rise/set, in degrees:
    /// refraction plus semi-diameter, less horizontal parallax for the Moon.
    pub fn standard_altitude(&self) -> f64 {
        match self {
            Body::Sun => -0.833,
            Body::Moon => -0.816,
        }
    }

    fn altitude(&self, datetime: NaiveDateTime, location: &GeographicLocation) -> f64 {
        let ctx = ObservationContext::new(datetime, location);
        let ecliptic = match self {
            Body::Sun => sun::position(&ctx),
            Body::Moon => moon::position(&ctx),
        };
        ctx.to_horizontal(&ctx.to_equatorial(&ecliptic)).altitude
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Sun => f.write_str("sun"),
            Body::Moon => f.write_str("moon"),
        }
    }
}

/// First rise and first set within the day; either may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiseSet {
    pub rise: Option<NaiveDateTime>,
    pub set: Option<NaiveDateTime>,
}

/// Find the first upward and downward crossings of the body's standard
/// altitude between 00:00 and 24:00 UTC on `date`.
pub fn rise_and_set(
    body: Body,
    date: NaiveDate,
    location: &GeographicLocation,
) -> ObservationResult<RiseSet> {
    location.validate()?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
        ObservationError::invalid_input(format!("date {} has no midnight", date))
    })?;
    let target = body.standard_altitude();
    let offset = |secs: i64| midnight + TimeDelta::seconds(secs);
    let height = |secs: i64| body.altitude(offset(secs), location) - target;

    let mut result = RiseSet {
        rise: None,
        set: None,
    };
    let mut prev_secs = 0;
    let mut prev = height(0);
    if !prev.is_finite() {
        return Err(ObservationError::computation(format!(
            "{} altitude is not finite at {}",
            body, midnight
        )));
    }

    let mut secs = SCAN_STEP_SECS;
    while secs <= SECONDS_PER_DAY && (result.rise.is_none() || result.set.is_none()) {
        let current = height(secs);
        if result.rise.is_none() && prev < 0.0 && current >= 0.0 {
            result.rise = Some(offset(bisect(&height, prev_secs, secs, true)));
        }
        if result.set.is_none() && prev >= 0.0 && current < 0.0 {
            result.set = Some(offset(bisect(&height, prev_secs, secs, false)));
        }
        prev = current;
        prev_secs = secs;
        secs += SCAN_STEP_SECS;
    }

    log::debug!("{} on {}: rise={:?} set={:?}", body, date, result.rise, result.set);
    Ok(RiseSet {
        rise: result.rise.map(truncate_seconds),
        set: result.set.map(truncate_seconds),
    })
}

/// Narrow a bracket to one second. `rising` selects which side of the
/// crossing is below the target.
fn bisect(height: &impl Fn(i64) -> f64, mut low: i64, mut high: i64, rising: bool) -> i64 {
    while high - low > 1 {
        let mid = low + (high - low) / 2;
        let above = height(mid) >= 0.0;
        if above == rising {
            high = mid;
        } else {
            low = mid;
        }
    }
    high
}

fn truncate_seconds(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_nanosecond(0).unwrap_or(dt)
}
