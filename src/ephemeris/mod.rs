//! Solar and lunar positions for one observer and instant.
//!
//! The series themselves come from the `astro` crate (VSOP87 for the Earth,
//! Meeus/ELP for the Moon); this module adds apparent-place corrections,
//! the horizon transform and topocentric parallax.
//!
//! ```text
//! timestamp + location ──► ObservationContext (built once)
//!                              │
//!            ┌─────────────────┼──────────────────┐
//!            ▼                 ▼                  │
//!     sun::position      moon::position           │
//!            │                 │                  │
//!            ├──► horizontal ◄─┤  (context)       │
//!            └──► phase ◄──────┘                  │
//! ```

pub mod context;
pub mod coords;
pub mod moon;
pub mod sun;

pub use context::ObservationContext;
pub use coords::{EclipticPosition, EquatorialPosition};

/// Reduce an angle to [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    let reduced = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if reduced >= 360.0 {
        0.0
    } else {
        reduced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert!(normalize_degrees(-1e-20) < 360.0);
    }
}
