//! Lunar position from the `astro` lunar theory.

use astro::lunar;

use super::context::ObservationContext;
use super::coords::EclipticPosition;
use super::normalize_degrees;

/// Apparent geocentric ecliptic position of the Moon.
pub fn position(ctx: &ObservationContext) -> EclipticPosition {
    let (point, distance_km) = lunar::geocent_ecl_pos(ctx.jde);

    EclipticPosition {
        longitude: normalize_degrees(point.long.to_degrees() + ctx.nutation_longitude),
        latitude: point.lat.to_degrees(),
        distance_km,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_timestamp, GeographicLocation};

    #[test]
    fn test_meeus_example_47a() {
        // 1992-04-12 0h TD: apparent λ = 133.167265°, β = -3.229126°, Δ = 368409.7 km
        let loc = GeographicLocation::new(0.0, 0.0, 0.0).unwrap();
        let ctx = ObservationContext::new(parse_timestamp("1992-04-11T23:58:50.8").unwrap(), &loc);
        let moon = position(&ctx);
        assert!((moon.longitude - 133.1673).abs() < 0.1, "longitude {}", moon.longitude);
        assert!((moon.latitude + 3.2291).abs() < 0.1, "latitude {}", moon.latitude);
        assert!((moon.distance_km - 368_409.7).abs() < 300.0, "distance {}", moon.distance_km);
    }

    #[test]
    fn test_distance_within_orbit_bounds() {
        let loc = GeographicLocation::new(0.0, 0.0, 0.0).unwrap();
        for day in 1..=28 {
            let ts = parse_timestamp(&format!("2026-02-{:02}T00:00:00", day)).unwrap();
            let moon = position(&ObservationContext::new(ts, &loc));
            assert!(moon.distance_km > 356_000.0 && moon.distance_km < 407_000.0);
            assert!(moon.latitude.abs() < 5.4);
        }
    }
}
