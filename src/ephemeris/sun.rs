//! Solar position from the VSOP87 Earth series.

use astro::sun;

use super::context::ObservationContext;
use super::coords::EclipticPosition;
use super::normalize_degrees;

/// Astronomical unit in kilometers.
pub const AU_KM: f64 = 149_597_870.7;

/// Annual aberration at 1 AU, in degrees (20.4898").
const ABERRATION_DEG: f64 = 20.4898 / 3600.0;

/// Apparent geocentric ecliptic position of the Sun.
pub fn position(ctx: &ObservationContext) -> EclipticPosition {
    let (point, radius_au) = sun::geocent_ecl_pos(ctx.jde);
    let aberration = -ABERRATION_DEG / radius_au;

    EclipticPosition {
        longitude: normalize_degrees(
            point.long.to_degrees() + ctx.nutation_longitude + aberration,
        ),
        latitude: point.lat.to_degrees(),
        distance_km: radius_au * AU_KM,
    }
}
