/// Apparent geocentric ecliptic position of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipticPosition {
    /// Ecliptic longitude (degrees, [0, 360))
    pub longitude: f64,
    /// Ecliptic latitude (degrees)
    pub latitude: f64,
    pub distance_km: f64,
}

/// Geocentric equatorial position of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquatorialPosition {
    /// Right ascension (degrees, [0, 360))
    pub right_ascension: f64,
    /// Declination (degrees)
    pub declination: f64,
    pub distance_km: f64,
}

impl EclipticPosition {
    /// Angular separation from another ecliptic position, in degrees.
    pub fn separation(&self, other: &EclipticPosition) -> f64 {
        let (b1, b2) = (self.latitude.to_radians(), other.latitude.to_radians());
        let dl = (self.longitude - other.longitude).to_radians();
        let cos_sep = b1.sin() * b2.sin() + b1.cos() * b2.cos() * dl.cos();
        cos_sep.clamp(-1.0, 1.0).acos().to_degrees()
    }
}
