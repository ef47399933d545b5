use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{ObservationError, ObservationResult};

/// Julian Date of the Unix epoch (1970-01-01 00:00:00 UTC).
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian Date of the J2000.0 epoch.
pub const J2000_JD: f64 = 2_451_545.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian Date representation (UTC based unless stated otherwise).
/// JD 0 = -4712-01-01 12:00:00
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct JulianDate(f64);

impl JulianDate {
    /// Raw JD value as f64.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Create from Unix timestamp (seconds since 1970-01-01 00:00:00 UTC).
    pub fn from_unix_timestamp(timestamp: f64) -> Self {
        Self(timestamp / SECONDS_PER_DAY + UNIX_EPOCH_JD)
    }

    /// Create from a naive datetime interpreted as UTC.
    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        let utc = dt.and_utc();
        Self::from_unix_timestamp(
            utc.timestamp() as f64 + utc.timestamp_subsec_nanos() as f64 / 1e9,
        )
    }

    /// Day of the week, 0 = Sunday through 6 = Saturday.
    pub fn weekday(&self) -> u32 {
        let jdn = (self.0 + 0.5).floor() as i64;
        (jdn + 1).rem_euclid(7) as u32
    }

    /// Shift by a number of seconds, e.g. UT to TT.
    pub fn add_seconds(&self, seconds: f64) -> Self {
        Self(self.0 + seconds / SECONDS_PER_DAY)
    }
}

/// Parse a `YYYY-MM-DD` date and an `HH:MM:SS[.fff]` time into a UTC datetime.
pub fn parse_date_time(date: &str, time: &str) -> ObservationResult<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| ObservationError::parse(format!("date '{}': {}", date, e)))?;
    let time_str = time.trim();
    let time = NaiveTime::parse_from_str(time_str, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(time_str, "%H:%M"))
        .map_err(|e| ObservationError::parse(format!("time '{}': {}", time_str, e)))?;
    Ok(date.and_time(time))
}

/// Parse an ISO-8601 timestamp. A zone suffix is converted to UTC; a bare
/// timestamp is taken as UTC.
pub fn parse_timestamp(timestamp: &str) -> ObservationResult<NaiveDateTime> {
    let trimmed = timestamp.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|e| ObservationError::parse(format!("timestamp '{}': {}", trimmed, e)))
}

/// Format a datetime the way frames carry it: `YYYY-MM-DDTHH:MM:SS`, with
/// fractional seconds only when present.
pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// Span between two datetimes in hours.
pub fn span_hours(start: &NaiveDateTime, end: &NaiveDateTime) -> f64 {
    let span: TimeDelta = *end - *start;
    span.num_milliseconds() as f64 / 3_600_000.0
}
