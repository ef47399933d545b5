//! Day-of-week lookup via the Julian Date.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{format_timestamp, JulianDate};

pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOfWeek {
    pub julian_date: f64,
    /// 0 = Sunday ... 6 = Saturday
    pub day_of_week: u32,
    pub day_name: String,
    pub input_datetime: String,
}

pub fn day_of_week(datetime: NaiveDateTime) -> DayOfWeek {
    let jd = JulianDate::from_datetime(datetime);
    let index = jd.weekday();
    DayOfWeek {
        julian_date: jd.value(),
        day_of_week: index,
        day_name: DAY_NAMES[index as usize % DAY_NAMES.len()].to_string(),
        input_datetime: format_timestamp(&datetime),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_date_time;

    #[test]
    fn test_known_weekdays() {
        let cases = [
            ("2000-01-01", "Saturday"),
            ("2024-02-29", "Thursday"),
            ("2026-02-02", "Monday"),
            ("1969-07-20", "Sunday"),
        ];
        for (date, name) in cases {
            let result = day_of_week(parse_date_time(date, "12:00:00").unwrap());
            assert_eq!(result.day_name, name, "{}", date);
        }
    }

    #[test]
    fn test_late_evening_stays_on_same_day() {
        let result = day_of_week(parse_date_time("2026-02-02", "23:59:59").unwrap());
        assert_eq!(result.day_of_week, 1);
        assert_eq!(result.input_datetime, "2026-02-02T23:59:59");
    }
}
