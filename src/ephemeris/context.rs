//! Per-timestamp astronomical reference frame.
//!
//! An [`ObservationContext`] holds everything that depends only on the
//! instant and the observer: time scales, nutation, obliquity, sidereal
//! time and the observer's geocentric terms. It is built once per frame
//! and borrowed by every body computed for that frame.

use astro::{coords, ecliptic, nutation, planet, time};
use chrono::{Datelike, NaiveDateTime};

use super::coords::{EclipticPosition, EquatorialPosition};
use super::normalize_degrees;
use crate::models::{CelestialPosition, GeographicLocation, JulianDate};

/// Earth equatorial radius (kilometers).
pub const EARTH_RADIUS_KM: f64 = 6_378.14;

/// Observer terms that do not change between bodies.
#[derive(Debug, Clone, Copy)]
pub struct ObserverTerms {
    /// Geodetic latitude (radians)
    pub latitude: f64,
    /// ρ sin φ' (geocentric, in Earth radii)
    pub rho_sin_phi: f64,
    /// ρ cos φ' (geocentric, in Earth radii)
    pub rho_cos_phi: f64,
    /// East-positive longitude (degrees)
    pub longitude_deg: f64,
}

impl ObserverTerms {
    fn new(location: &GeographicLocation) -> Self {
        let latitude = location.latitude.to_radians();
        let (rho_sin_phi, rho_cos_phi) =
            planet::earth::rho_sin_cos_phi(latitude, location.elevation);
        Self {
            latitude,
            rho_sin_phi,
            rho_cos_phi,
            longitude_deg: location.longitude,
        }
    }
}

/// Shared reference frame for one instant and one observer.
#[derive(Debug, Clone, Copy)]
pub struct ObservationContext {
    /// UTC Julian Date
    pub jd_ut: JulianDate,
    /// Julian Ephemeris Day (TT), the argument of the solar and lunar theories
    pub jde: f64,
    /// Nutation in longitude (degrees)
    pub nutation_longitude: f64,
    /// True obliquity of the ecliptic (degrees)
    pub obliquity: f64,
    /// Apparent local sidereal time (degrees)
    pub local_sidereal_time: f64,
    pub observer: ObserverTerms,
}

impl ObservationContext {
    pub fn new(datetime: NaiveDateTime, location: &GeographicLocation) -> Self {
        let jd_ut = JulianDate::from_datetime(datetime);
        let delta_t = time::delta_t(datetime.year(), datetime.month() as u8);
        let jde = jd_ut.add_seconds(delta_t).value();

        let (nut_long, nut_oblq) = nutation::nutation(jde);
        let true_oblq = ecliptic::mn_oblq_laskar(jde) + nut_oblq;
        let gast = time::apprnt_sidr(time::mn_sidr(jd_ut.value()), nut_long, true_oblq);
        let observer = ObserverTerms::new(location);

        Self {
            jd_ut,
            jde,
            nutation_longitude: nut_long.to_degrees(),
            obliquity: true_oblq.to_degrees(),
            local_sidereal_time: normalize_degrees(gast.to_degrees() + observer.longitude_deg),
            observer,
        }
    }

    /// Apparent ecliptic position to geocentric equatorial coordinates.
    pub fn to_equatorial(&self, ecliptic: &EclipticPosition) -> EquatorialPosition {
        let long = ecliptic.longitude.to_radians();
        let lat = ecliptic.latitude.to_radians();
        let oblq = self.obliquity.to_radians();

        EquatorialPosition {
            right_ascension: normalize_degrees(coords::asc_frm_ecl(long, lat, oblq).to_degrees()),
            declination: coords::dec_frm_ecl(long, lat, oblq).to_degrees(),
            distance_km: ecliptic.distance_km,
        }
    }

    /// Geocentric equatorial coordinates to the observer's horizon, with
    /// topocentric parallax applied. Refraction is ignored.
    pub fn to_horizontal(&self, equatorial: &EquatorialPosition) -> CelestialPosition {
        let obs = &self.observer;
        let hour_angle =
            normalize_degrees(self.local_sidereal_time - equatorial.right_ascension).to_radians();
        let dec = equatorial.declination.to_radians();
        let sin_parallax = EARTH_RADIUS_KM / equatorial.distance_km;

        // Meeus ch. 40 rigorous parallax
        let denom = dec.cos() - obs.rho_cos_phi * sin_parallax * hour_angle.cos();
        let delta_ra = (-obs.rho_cos_phi * sin_parallax * hour_angle.sin()).atan2(denom);
        let topo_dec =
            ((dec.sin() - obs.rho_sin_phi * sin_parallax) * delta_ra.cos()).atan2(denom);
        let topo_ha = hour_angle - delta_ra;

        let altitude = coords::alt_frm_eq(topo_ha, topo_dec, obs.latitude).to_degrees();
        // Azimuth comes back measured from the south; frames use north = 0
        let azimuth = coords::az_frm_eq(topo_ha, topo_dec, obs.latitude).to_degrees() + 180.0;

        CelestialPosition::from_horizontal(altitude, normalize_degrees(azimuth))
    }
}
