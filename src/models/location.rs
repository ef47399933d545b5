use serde::{Deserialize, Serialize};

use crate::error::{ObservationError, ObservationResult};

/// Observer location on the Earth's surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeographicLocation {
    /// Latitude in decimal degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180, east positive)
    pub longitude: f64,
    /// Elevation in meters above sea level
    #[serde(default)]
    pub elevation: f64,
}

impl GeographicLocation {
    pub fn new(latitude: f64, longitude: f64, elevation: f64) -> ObservationResult<Self> {
        let location = Self {
            latitude,
            longitude,
            elevation,
        };
        location.validate()?;
        Ok(location)
    }

    /// Check the coordinate ranges. Deserialized locations bypass `new`, so
    /// every service entry point calls this before computing.
    pub fn validate(&self) -> ObservationResult<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ObservationError::invalid_input(format!(
                "Latitude must be between -90 and 90 degrees, got {}",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ObservationError::invalid_input(format!(
                "Longitude must be between -180 and 180 degrees, got {}",
                self.longitude
            )));
        }
        if !self.elevation.is_finite() {
            return Err(ObservationError::invalid_input(format!(
                "Elevation must be a finite number of meters, got {}",
                self.elevation
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_location() {
        let loc = GeographicLocation::new(51.5, -0.1, 0.0).unwrap();
        assert_eq!(loc.latitude, 51.5);
        assert_eq!(loc.longitude, -0.1);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        assert!(GeographicLocation::new(90.0, 180.0, 0.0).is_ok());
        assert!(GeographicLocation::new(-90.0, -180.0, 0.0).is_ok());
    }

    #[test]
    fn test_latitude_out_of_range() {
        let err = GeographicLocation::new(91.0, 0.0, 0.0).unwrap_err();
        assert!(err.to_string().contains("Latitude must be between -90 and 90"));
    }

    #[test]
    fn test_longitude_out_of_range() {
        let err = GeographicLocation::new(0.0, 181.0, 0.0).unwrap_err();
        assert!(err.to_string().contains("Longitude must be between -180 and 180"));
    }

    #[test]
    fn test_nan_rejected() {
        assert!(GeographicLocation::new(f64::NAN, 0.0, 0.0).is_err());
        assert!(GeographicLocation::new(0.0, 0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_elevation_defaults_to_zero() {
        let loc: GeographicLocation =
            serde_json::from_str(r#"{"latitude": 10.0, "longitude": 20.0}"#).unwrap();
        assert_eq!(loc.elevation, 0.0);
    }
}
