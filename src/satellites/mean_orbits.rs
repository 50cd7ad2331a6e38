//! Low-precision theory of the Galilean satellites.
//!
//! Each moon moves on a circular orbit in Jupiter's equatorial plane. Mean longitudes
//! are the linear terms of Lieske's E5 theory (epoch JD 2443000.5) plus the largest
//! periodic term of each moon:
//!
//! ```text
//! Io       : 0.47259° sin 2(l1 − l2)      (Laplace resonance)
//! Europa   : 1.06476° sin 2(l2 − l3)      (Laplace resonance)
//! Ganymede : 0.16490° sin (l3 − ϖ3)       (equation of centre)
//! Callisto : 0.84287° sin (l4 − ϖ4)       (equation of centre)
//! ```
//!
//! Longitudes are counted along the ecliptic to the ascending node of Jupiter's
//! equator, then along the equator. Jupiter's pole follows the IAU rotational
//! elements. Positions are light-time corrected and projected on two sky planes:
//! the one seen from the Earth (moon disks) and the one seen from the Sun (shadows).
//!
//! Event times from this theory are typically within a few minutes of the
//! almanac values.

use nalgebra::Vector3;

use crate::{
    constants::{
        AstronomicalUnit, AU, J2000, JD, JUPITER_RADIUS, LIGHT_TIME_PER_AU, RADEG, SUN_RADIUS,
    },
    earth_orientation::{equatorial_to_ecliptic, obleq, spherical_to_cartesian},
    ephemeris::Heliocentric,
    satellites::{Moon, MoonFrame, SatelliteTheory},
    time::{centuries_since_j2000, utc_to_tt},
};

/// Mean orbital radii in Jupiter equatorial radii.
const ORBIT_RADII: [f64; 4] = [5.9057, 9.3966, 14.9883, 26.3627];

/// Epoch of the mean longitudes (JD, TT).
const E5_EPOCH: JD = 2443000.5;

/// Orthonormal sky-plane basis for one viewpoint.
#[derive(Debug, Clone, Copy)]
struct SkyFrame {
    x: Vector3<f64>,
    y: Vector3<f64>,
    z: Vector3<f64>,
}

impl SkyFrame {
    /// `line_of_sight` points from the viewpoint to Jupiter; `pole` is Jupiter's north pole.
    fn new(line_of_sight: &Vector3<f64>, pole: &Vector3<f64>) -> Self {
        let z = line_of_sight.normalize();
        let y = (pole - pole.dot(&z) * z).normalize();
        let x = y.cross(&z);
        SkyFrame { x, y, z }
    }

    fn project(&self, v: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(v.dot(&self.x), v.dot(&self.y), v.dot(&self.z))
    }
}

/// Jupiter's north pole as a unit vector in ecliptic J2000 coordinates.
fn jupiter_pole(jd_tt: JD) -> Vector3<f64> {
    let t = centuries_since_j2000(jd_tt);
    let ra = (268.056595 - 0.006499 * t) * RADEG;
    let dec = (64.495303 + 0.002413 * t) * RADEG;
    equatorial_to_ecliptic(&spherical_to_cartesian(ra, dec, 1.0), obleq(J2000))
}

/// True longitudes of the four moons, in degrees.
fn moon_longitudes(jd_tt: JD) -> [f64; 4] {
    let t = jd_tt - E5_EPOCH;

    let l1 = 106.07719 + 203.488955790 * t;
    let l2 = 175.73161 + 101.374724735 * t;
    let l3 = 120.55883 + 50.317609207 * t;
    let l4 = 84.44459 + 21.571071177 * t;

    let peri3 = 188.1840 + 0.00712734 * t;
    let peri4 = 335.2868 + 0.00184000 * t;

    let sin_deg = |a: f64| (a * RADEG).sin();

    [
        l1 + 0.47259 * sin_deg(2.0 * (l1 - l2)),
        l2 + 1.06476 * sin_deg(2.0 * (l2 - l3)),
        l3 + 0.16490 * sin_deg(l3 - peri3),
        l4 + 0.84287 * sin_deg(l4 - peri4),
    ]
}

/// Jovicentric ecliptic positions of the four moons, in Jupiter equatorial radii.
fn jovicentric_positions(jd_tt: JD, pole: &Vector3<f64>) -> [Vector3<f64>; 4] {
    let node = Vector3::z().cross(pole).normalize();
    let quadrature = pole.cross(&node);
    let node_longitude = node.y.atan2(node.x);

    let longitudes = moon_longitudes(jd_tt);
    std::array::from_fn(|i| {
        let theta = longitudes[i] * RADEG - node_longitude;
        ORBIT_RADII[i] * (theta.cos() * node + theta.sin() * quadrature)
    })
}

/// Built-in [`SatelliteTheory`] with circular orbits and the dominant perturbations.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanOrbitTheory;

impl SatelliteTheory for MeanOrbitTheory {
    fn positions(&self, jd: JD, earth: &Heliocentric, jupiter: &Heliocentric) -> MoonFrame {
        let jupiter_helio = jupiter.to_cartesian();
        let geocentric = jupiter_helio - earth.to_cartesian();

        // Light leaving Jupiter's system now reaches the Earth after Δ·τ
        let emission = utc_to_tt(jd) - geocentric.norm() * LIGHT_TIME_PER_AU;
        let pole = jupiter_pole(emission);
        let moons = jovicentric_positions(emission, &pole);

        let earth_view = SkyFrame::new(&geocentric, &pole);
        let sun_view = SkyFrame::new(&jupiter_helio, &pole);

        MoonFrame::new(std::array::from_fn(|i| {
            [earth_view.project(&moons[i]), sun_view.project(&moons[i])]
        }))
    }

    /// Penumbral radius of the shadow cone of `eclipser` at the target's distance.
    fn shadow_semidiameter(
        &self,
        sun_distance: AstronomicalUnit,
        _earth_distance: AstronomicalUnit,
        eclipser: Moon,
        eclipser_shadow: &Vector3<f64>,
        target_shadow: &Vector3<f64>,
    ) -> f64 {
        let radius = eclipser.radius();
        let behind = (target_shadow.z - eclipser_shadow.z) * JUPITER_RADIUS;
        let penumbra = if behind > 0.0 {
            radius + behind * (SUN_RADIUS + radius) / (sun_distance * AU)
        } else {
            radius
        };
        penumbra / JUPITER_RADIUS
    }
}
