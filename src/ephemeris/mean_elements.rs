//! Keplerian mean-elements ephemeris.
//!
//! Elements and rates are the 1800–2050 fit of Standish, *Keplerian Elements for
//! Approximate Positions of the Major Planets* (JPL), referred to the mean ecliptic
//! and equinox of J2000. The Earth is represented by the Earth–Moon barycenter.
//!
//! Accuracy is a few arcminutes for Jupiter and under an arcminute for the Earth,
//! which is ample for the monthly interpolation model and the altitude context.

use nalgebra::Vector3;

use crate::{
    constants::{Degree, JD, RADEG},
    earth_orientation::rotmt,
    ephemeris::{Body, Heliocentric, HeliocentricEphemeris},
    time::{centuries_since_j2000, utc_to_tt},
};

/// Mean orbital elements at J2000 and their rates per Julian century.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MeanElements {
    /// semi-major axis (AU) and rate
    a: (f64, f64),
    /// eccentricity and rate
    e: (f64, f64),
    /// inclination (deg) and rate
    i: (Degree, Degree),
    /// mean longitude (deg) and rate
    l: (Degree, Degree),
    /// longitude of perihelion (deg) and rate
    peri: (Degree, Degree),
    /// longitude of the ascending node (deg) and rate
    node: (Degree, Degree),
}

const EM_BARY: MeanElements = MeanElements {
    a: (1.00000261, 0.00000562),
    e: (0.01671123, -0.00004392),
    i: (-0.00001531, -0.01294668),
    l: (100.46457166, 35999.37244981),
    peri: (102.93768193, 0.32327364),
    node: (0.0, 0.0),
};

const JUPITER: MeanElements = MeanElements {
    a: (5.20288700, -0.00011607),
    e: (0.04838624, -0.00013253),
    i: (1.30439695, -0.00183714),
    l: (34.39644051, 3034.74612775),
    peri: (14.72847983, 0.21252668),
    node: (100.47390909, 0.20469106),
};

/// Solve Kepler's equation `E - e·sin E = M` by Newton iterations.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: `M` in radians.
/// * `ecc`: eccentricity, `0 ≤ e < 1`.
///
/// Return
/// ------
/// * the eccentric anomaly `E` in radians.
pub(crate) fn solve_kepler(mean_anomaly: f64, ecc: f64) -> f64 {
    const MAX_ITER: usize = 30;
    const TOL: f64 = 1e-13;

    let mut ecc_anomaly = if ecc < 0.8 {
        mean_anomaly
    } else {
        std::f64::consts::PI
    };

    for _ in 0..MAX_ITER {
        let delta = (ecc_anomaly - ecc * ecc_anomaly.sin() - mean_anomaly)
            / (1.0 - ecc * ecc_anomaly.cos());
        ecc_anomaly -= delta;
        if delta.abs() < TOL {
            break;
        }
    }
    ecc_anomaly
}

impl MeanElements {
    fn heliocentric(&self, t: f64) -> Heliocentric {
        let at = |(v0, rate): (f64, f64)| v0 + rate * t;

        let a = at(self.a);
        let e = at(self.e);
        let incl = at(self.i) * RADEG;
        let l = at(self.l);
        let peri = at(self.peri);
        let node = at(self.node);

        let arg_peri = (peri - node) * RADEG;
        let mean_anomaly = ((l - peri + 180.0).rem_euclid(360.0) - 180.0) * RADEG;

        let ecc_anomaly = solve_kepler(mean_anomaly, e);
        let in_plane = Vector3::new(
            a * (ecc_anomaly.cos() - e),
            a * (1.0 - e * e).sqrt() * ecc_anomaly.sin(),
            0.0,
        );

        let ecliptic = rotmt(node * RADEG, 2) * rotmt(incl, 0) * rotmt(arg_peri, 2) * in_plane;
        Heliocentric::from_cartesian(&ecliptic)
    }
}

/// Heliocentric ephemeris from Keplerian mean elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanElementsEphemeris;

impl HeliocentricEphemeris for MeanElementsEphemeris {
    fn heliocentric(&self, body: Body, jd: JD) -> Heliocentric {
        let t = centuries_since_j2000(utc_to_tt(jd));
        match body {
            Body::Earth => EM_BARY.heliocentric(t),
            Body::Jupiter => JUPITER.heliocentric(t),
        }
    }
}

#[cfg(test)]
mod mean_elements_test {
    use super::*;
    use crate::constants::J2000;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_solve_kepler() {
        // Meeus example 30.a: e = 0.100, M = 5° → E = 5.554589°
        let e_anom = solve_kepler(5.0 * RADEG, 0.1);
        assert_abs_diff_eq!(e_anom / RADEG, 5.554589, epsilon = 1e-6);

        let e_anom = solve_kepler(2.0, 0.95);
        assert_abs_diff_eq!(e_anom - 0.95 * e_anom.sin(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_earth_at_j2000() {
        let earth = MeanElementsEphemeris.heliocentric(Body::Earth, J2000);
        assert_abs_diff_eq!(earth.l, 100.38, epsilon = 0.1);
        assert_abs_diff_eq!(earth.b, 0.0, epsilon = 0.01);
        assert_abs_diff_eq!(earth.r, 0.9833, epsilon = 0.001);
    }

    #[test]
    fn test_jupiter_at_j2000() {
        let jupiter = MeanElementsEphemeris.heliocentric(Body::Jupiter, J2000);
        assert_abs_diff_eq!(jupiter.l, 36.29, epsilon = 0.3);
        assert_abs_diff_eq!(jupiter.b, -1.17, epsilon = 0.1);
        assert_abs_diff_eq!(jupiter.r, 4.9654, epsilon = 0.01);
    }
}
