//! # Local altitude of the Sun and of Jupiter
//!
//! Each event boundary is annotated with the altitude of the Sun (is it dark?) and of
//! Jupiter (is the planet up?) for the observer. The chain applied to a geocentric
//! ecliptic J2000 vector is:
//!
//! 1. precession in longitude from J2000 to the date,
//! 2. nutation in longitude (Δψ),
//! 3. annual aberration,
//! 4. rotation to equatorial coordinates with the true obliquity,
//! 5. topocentric parallax from the observer's (ρ·cosφ′, ρ·sinφ′),
//! 6. hour angle from the apparent local sidereal time and altitude
//!    `sin h = sin φ · sin δ + cos φ · cos δ · cos H`.
//!
//! The geocentric Sun is the negated heliocentric Earth vector; the geocentric
//! Jupiter is the difference of the two heliocentric vectors. Refraction is not
//! applied.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{Degree, Radian, JD, PARALLAX_1AU, RADSEC},
    earth_orientation::{
        aberration, apparent_sidereal_time, cartesian_to_spherical, ecliptic_to_equatorial,
        nutation, precession_in_longitude, spherical_to_cartesian, true_obliquity,
    },
    ephemeris::Heliocentric,
    observer::GeoLocation,
    time::utc_to_tt,
};

/// Sun and Jupiter altitudes at one instant, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Altitudes {
    pub sun: Degree,
    pub jupiter: Degree,
}

/// Apparent right ascension, declination (radians) and distance (AU).
#[derive(Debug, Clone, Copy)]
struct Equatorial {
    ra: Radian,
    dec: Radian,
    distance: f64,
}

/// Apparent equatorial coordinates of date for a geocentric ecliptic J2000 vector.
fn apparent_equatorial(geocentric: &Vector3<f64>, sun_lon_j2000: Radian, jd_tt: JD) -> Equatorial {
    let (lon, lat, distance) = cartesian_to_spherical(geocentric);

    let precession = precession_in_longitude(jd_tt);
    let (dpsi, _) = nutation(jd_tt);
    let lon = lon + precession + dpsi * RADSEC;
    let sun_lon = sun_lon_j2000 + precession;

    let (dlon, dlat) = aberration(lon, lat, sun_lon);
    let ecliptic = spherical_to_cartesian(lon + dlon, lat + dlat, 1.0);
    let equatorial = ecliptic_to_equatorial(&ecliptic, true_obliquity(jd_tt));

    let (ra, dec, _) = cartesian_to_spherical(&equatorial);
    Equatorial { ra, dec, distance }
}

/// Altitude in degrees of a body with apparent coordinates `eq` for `location`.
fn topocentric_altitude(eq: &Equatorial, location: &GeoLocation, jd_ut: JD, jd_tt: JD) -> Degree {
    let local_sidereal = apparent_sidereal_time(jd_ut, jd_tt) + location.longitude().to_radians();
    let hour_angle = local_sidereal - eq.ra;

    let sin_parallax = (PARALLAX_1AU * RADSEC).sin() / eq.distance;
    let rho_cos = location.rho_cos_phi();
    let rho_sin = location.rho_sin_phi();

    let denom = eq.dec.cos() - rho_cos * sin_parallax * hour_angle.cos();
    let dra = (-rho_cos * sin_parallax * hour_angle.sin()).atan2(denom);
    let dec = ((eq.dec.sin() - rho_sin * sin_parallax) * dra.cos()).atan2(denom);
    let hour_angle = hour_angle - dra;

    let phi = location.latitude().to_radians();
    let sin_alt = phi.sin() * dec.sin() + phi.cos() * dec.cos() * hour_angle.cos();
    sin_alt.clamp(-1.0, 1.0).asin().to_degrees()
}

/// Altitude of the Sun for the observer at `jd` (UTC).
///
/// Arguments
/// ---------
/// * `earth`: heliocentric position of the Earth at `jd`.
/// * `jd`: Julian date, UTC.
/// * `location`: observer.
pub fn sun_altitude(earth: &Heliocentric, jd: JD, location: &GeoLocation) -> Degree {
    let jd_tt = utc_to_tt(jd);
    let sun = -earth.to_cartesian();
    let sun_lon = (earth.l + 180.0).to_radians();
    let eq = apparent_equatorial(&sun, sun_lon, jd_tt);
    topocentric_altitude(&eq, location, jd, jd_tt)
}

/// Altitude of Jupiter for the observer at `jd` (UTC).
pub fn jupiter_altitude(
    earth: &Heliocentric,
    jupiter: &Heliocentric,
    jd: JD,
    location: &GeoLocation,
) -> Degree {
    let jd_tt = utc_to_tt(jd);
    let geocentric = jupiter.to_cartesian() - earth.to_cartesian();
    let sun_lon = (earth.l + 180.0).to_radians();
    let eq = apparent_equatorial(&geocentric, sun_lon, jd_tt);
    topocentric_altitude(&eq, location, jd, jd_tt)
}

/// Both altitudes at once.
pub fn altitudes(
    earth: &Heliocentric,
    jupiter: &Heliocentric,
    jd: JD,
    location: &GeoLocation,
) -> Altitudes {
    Altitudes {
        sun: sun_altitude(earth, jd, location),
        jupiter: jupiter_altitude(earth, jupiter, jd, location),
    }
}

#[cfg(test)]
mod horizontal_test {
    use super::*;
    use crate::{
        ephemeris::{mean_elements::MeanElementsEphemeris, Body, HeliocentricEphemeris},
        time::calendar_to_jd,
    };
    use approx::assert_abs_diff_eq;

    fn earth_at(jd: JD) -> Heliocentric {
        MeanElementsEphemeris.heliocentric(Body::Earth, jd)
    }

    #[test]
    fn test_sun_declination_at_solstice() {
        // 2024-06-20 20:51 UTC
        let jd = calendar_to_jd(2024, 6, 20).unwrap() + (20.0 + 51.0 / 60.0) / 24.0;
        let earth = earth_at(jd);
        let eq = apparent_equatorial(
            &-earth.to_cartesian(),
            (earth.l + 180.0).to_radians(),
            utc_to_tt(jd),
        );
        assert_abs_diff_eq!(eq.dec.to_degrees(), 23.44, epsilon = 0.02);
        assert_abs_diff_eq!(eq.ra.to_degrees(), 90.0, epsilon = 0.1);
    }

    #[test]
    fn test_noon_sun_at_equator_on_equinox() {
        // Equinox 2024-03-20 03:06 UTC; the Sun culminates near 12:07 UTC at Greenwich
        let location = GeoLocation::new(0.0, 0.0, 0.0, 0.0).unwrap();
        let jd = calendar_to_jd(2024, 3, 20).unwrap() + 12.12 / 24.0;
        let alt = sun_altitude(&earth_at(jd), jd, &location);
        assert!(alt > 89.0, "noon altitude {alt}");

        let midnight = calendar_to_jd(2024, 3, 20).unwrap() + 0.12 / 24.0;
        let alt = sun_altitude(&earth_at(midnight), midnight, &location);
        assert!(alt < -89.0, "midnight altitude {alt}");
    }

    #[test]
    fn test_jupiter_high_at_opposition_midnight() {
        // Opposition on 2024-12-07, Jupiter declination about +22°
        let location = GeoLocation::new(0.0, 45.0, 0.0, 0.0).unwrap();
        let jd = calendar_to_jd(2024, 12, 7).unwrap();
        let earth = earth_at(jd);
        let jupiter = MeanElementsEphemeris.heliocentric(Body::Jupiter, jd);

        let alt = altitudes(&earth, &jupiter, jd, &location);
        assert!(alt.sun < -60.0, "sun altitude {}", alt.sun);
        assert!(alt.jupiter > 60.0, "jupiter altitude {}", alt.jupiter);
    }

    #[test]
    fn test_altitude_is_bounded() {
        let location = GeoLocation::new(-155.47, 19.82, 4200.0, -10.0).unwrap();
        let jd0 = calendar_to_jd(2025, 1, 1).unwrap();
        for hour in 0..72 {
            let jd = jd0 + hour as f64 / 24.0;
            let earth = earth_at(jd);
            let jupiter = MeanElementsEphemeris.heliocentric(Body::Jupiter, jd);
            let alt = altitudes(&earth, &jupiter, jd, &location);
            assert!(alt.sun.abs() <= 90.0);
            assert!(alt.jupiter.abs() <= 90.0);
        }
    }
}
