//! # Earth orientation and ecliptic/equatorial frames
//!
//! Low-level frame utilities used by the altitude annotator:
//!
//! - mean obliquity of the ecliptic (IAU 1976),
//! - nutation in longitude and obliquity (principal terms of the IAU 1980 series),
//! - equation of the equinoxes and apparent sidereal time,
//! - general precession in longitude from J2000 to date,
//! - annual aberration in ecliptic coordinates,
//! - ecliptic → equatorial rotation.
//!
//! Angles are radians unless the name says otherwise. The nutation series is
//! truncated to the four largest terms, which keeps the error below 0.5″ and is
//! far below what altitude context needs.

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::{
    constants::{ArcSec, Radian, ABERRATION_CONSTANT, DPI, JD, RADEG, RADSEC},
    time::{centuries_since_j2000, gmst},
};

/// Compute the mean obliquity of the ecliptic at a given epoch (IAU 1976 model).
///
/// Arguments
/// ---------
/// * `jd_tt`: Julian date (TT scale).
///
/// Returns
/// --------
/// * Mean obliquity of the ecliptic in radians.
///
/// The obliquity is the cubic `ε = ε₀ + ε₁·T + ε₂·T² + ε₃·T³` in Julian centuries
/// since J2000, evaluated with Horner's method.
pub fn obleq(jd_tt: JD) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.00059 * RADSEC;
    let ob3 = 0.001813 * RADSEC;

    let t = centuries_since_j2000(jd_tt);

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Nutation in longitude and obliquity `(Δψ, Δε)` in arcseconds.
///
/// Only the principal terms of the IAU 1980 series are kept: the 18.6-year term of
/// the lunar node and the semi-annual/fortnightly solar and lunar terms.
pub fn nutation(jd_tt: JD) -> (ArcSec, ArcSec) {
    let t = centuries_since_j2000(jd_tt);

    // Longitude of the Moon's ascending node
    let omega = (125.04452 - 1934.136261 * t) * RADEG;
    // Mean longitudes of the Sun and of the Moon
    let l_sun = (280.4665 + 36000.7698 * t) * RADEG;
    let l_moon = (218.3165 + 481267.8813 * t) * RADEG;

    let dpsi = -17.20 * omega.sin() - 1.32 * (2.0 * l_sun).sin() - 0.23 * (2.0 * l_moon).sin()
        + 0.21 * (2.0 * omega).sin();
    let deps = 9.20 * omega.cos() + 0.57 * (2.0 * l_sun).cos() + 0.10 * (2.0 * l_moon).cos()
        - 0.09 * (2.0 * omega).cos();

    (dpsi, deps)
}

/// True obliquity of the ecliptic `ε + Δε`, in radians.
pub fn true_obliquity(jd_tt: JD) -> Radian {
    let (_, deps) = nutation(jd_tt);
    obleq(jd_tt) + deps * RADSEC
}

/// Equation of the equinoxes `Δψ·cos ε`, in radians.
pub fn equequ(jd_tt: JD) -> Radian {
    let (dpsi, _) = nutation(jd_tt);
    RADSEC * dpsi * obleq(jd_tt).cos()
}

/// Greenwich apparent sidereal time in radians, in `[0, 2π)`.
///
/// Arguments
/// ---------
/// * `jd_ut`: Julian date in UT (UTC accepted).
/// * `jd_tt`: the same instant in TT, used for the nutation terms.
pub fn apparent_sidereal_time(jd_ut: JD, jd_tt: JD) -> Radian {
    (gmst(jd_ut) + equequ(jd_tt)).rem_euclid(DPI)
}

/// General precession in ecliptic longitude accumulated from J2000 to `jd_tt`, in radians.
pub fn precession_in_longitude(jd_tt: JD) -> Radian {
    let t = centuries_since_j2000(jd_tt);
    (5028.796195 * t + 1.1054348 * t * t) * RADSEC
}

/// Rotation matrix of angle `alpha` (radians) around the X (`k = 0`), Y (`k = 1`)
/// or Z (`k = 2`) axis.
///
/// The rotation is applied to the vector in a fixed frame (active convention),
/// so a change of basis uses the opposite angle.
///
/// # Panics
///
/// Panics if `k > 2`.
pub fn rotmt(alpha: f64, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("rotmt: invalid axis index {k} (must be 0, 1 or 2)"),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Rotate a vector expressed in ecliptic coordinates into equatorial coordinates
/// for the obliquity `eps` (radians).
pub fn ecliptic_to_equatorial(v: &Vector3<f64>, eps: Radian) -> Vector3<f64> {
    rotmt(eps, 0) * v
}

/// Rotate a vector expressed in equatorial coordinates into ecliptic coordinates
/// for the obliquity `eps` (radians).
pub fn equatorial_to_ecliptic(v: &Vector3<f64>, eps: Radian) -> Vector3<f64> {
    rotmt(-eps, 0) * v
}

/// Annual aberration `(Δλ, Δβ)` in radians for a body at ecliptic longitude `lon`
/// and latitude `lat`, with the Sun at geocentric longitude `sun_lon`.
///
/// Circular-orbit approximation of the Earth (the eccentricity terms are below 0.35″).
pub fn aberration(lon: Radian, lat: Radian, sun_lon: Radian) -> (Radian, Radian) {
    let k = ABERRATION_CONSTANT * RADSEC;
    let dlon = -k * (sun_lon - lon).cos() / lat.cos();
    let dlat = -k * lat.sin() * (sun_lon - lon).sin();
    (dlon, dlat)
}

/// Spherical coordinates `(longitude, latitude, distance)` of a rectangular vector.
///
/// The longitude is in `[0, 2π)`; a null vector maps to `(0, 0, 0)`.
pub fn cartesian_to_spherical(v: &Vector3<f64>) -> (Radian, Radian, f64) {
    let norm = v.norm();
    if norm == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let lon = v.y.atan2(v.x).rem_euclid(DPI);
    let lat = (v.z / norm).asin();
    (lon, lat, norm)
}

/// Rectangular vector from spherical coordinates (radians, any distance unit).
pub fn spherical_to_cartesian(lon: Radian, lat: Radian, distance: f64) -> Vector3<f64> {
    Vector3::new(
        distance * lat.cos() * lon.cos(),
        distance * lat.cos() * lon.sin(),
        distance * lat.sin(),
    )
}

#[cfg(test)]
mod earth_orientation_test {
    use super::*;
    use crate::constants::J2000;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_obliquity() {
        assert_abs_diff_eq!(obleq(J2000), 0.40909280422232897, epsilon = 1e-15);
    }

    #[test]
    fn test_nutation_j2000() {
        // IAU 1980 full series at J2000: Δψ = -13.92″, Δε = -5.77″
        let (dpsi, deps) = nutation(J2000);
        assert_abs_diff_eq!(dpsi, -13.92, epsilon = 0.5);
        assert_abs_diff_eq!(deps, -5.77, epsilon = 0.5);
    }

    #[test]
    fn test_ecliptic_equatorial_round_trip_axes() {
        let eps = obleq(J2000);
        // The ecliptic north pole sits at declination 90° - ε
        let pole = ecliptic_to_equatorial(&Vector3::z(), eps);
        let (_, dec, _) = cartesian_to_spherical(&pole);
        assert_abs_diff_eq!(dec, std::f64::consts::FRAC_PI_2 - eps, epsilon = 1e-12);

        let back = equatorial_to_ecliptic(&pole, eps);
        assert_abs_diff_eq!(back, Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_spherical_conversions() {
        let v = spherical_to_cartesian(1.2, -0.3, 5.2);
        let (lon, lat, r) = cartesian_to_spherical(&v);
        assert_abs_diff_eq!(lon, 1.2, epsilon = 1e-12);
        assert_abs_diff_eq!(lat, -0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(r, 5.2, epsilon = 1e-12);
        assert_eq!(cartesian_to_spherical(&Vector3::zeros()), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_aberration_at_conjunction() {
        // Body in the ecliptic at the Sun's longitude: Δλ = -κ
        let (dlon, dlat) = aberration(1.0, 0.0, 1.0);
        assert_abs_diff_eq!(dlon, -ABERRATION_CONSTANT * RADSEC, epsilon = 1e-15);
        assert_abs_diff_eq!(dlat, 0.0, epsilon = 1e-15);
    }

    #[test]
    #[should_panic]
    fn test_rotmt_invalid_axis() {
        rotmt(0.1, 3);
    }
}
