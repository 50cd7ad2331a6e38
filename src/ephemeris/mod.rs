//! # Heliocentric ephemeris access
//!
//! The event engine does not compute planetary positions itself; it samples a
//! [`HeliocentricEphemeris`] a handful of times per month and interpolates (see
//! [`PositionModel`](crate::position_model::PositionModel)).
//!
//! Coordinates are **heliocentric ecliptic J2000** spherical triples
//! ([`Heliocentric`]): longitude and latitude in **degrees**, radius vector in **AU**.
//! Times are Julian dates in **UTC**; providers convert to their own time scale.
//!
//! The crate ships [`MeanElementsEphemeris`](crate::ephemeris::mean_elements::MeanElementsEphemeris),
//! a Keplerian mean-elements provider good to a few arcminutes over 1800–2050.
//! Any higher-precision source (VSOP87, JPL files) can be plugged in by implementing
//! the trait.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{AstronomicalUnit, Degree, JD},
    earth_orientation::{cartesian_to_spherical, spherical_to_cartesian},
};

pub mod mean_elements;

/// Solar-system bodies the engine needs heliocentric positions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
    Earth,
    Jupiter,
}

/// Heliocentric ecliptic spherical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Heliocentric {
    /// Ecliptic longitude, degrees
    pub l: Degree,
    /// Ecliptic latitude, degrees
    pub b: Degree,
    /// Radius vector, AU
    pub r: AstronomicalUnit,
}

impl Heliocentric {
    pub fn new(l: Degree, b: Degree, r: AstronomicalUnit) -> Self {
        Heliocentric { l, b, r }
    }

    /// Rectangular ecliptic vector in AU.
    pub fn to_cartesian(&self) -> Vector3<f64> {
        spherical_to_cartesian(self.l.to_radians(), self.b.to_radians(), self.r)
    }

    /// Build from a rectangular ecliptic vector in AU.
    pub fn from_cartesian(v: &Vector3<f64>) -> Self {
        let (lon, lat, r) = cartesian_to_spherical(v);
        Heliocentric {
            l: lon.to_degrees(),
            b: lat.to_degrees(),
            r,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.l.is_finite() && self.b.is_finite() && self.r.is_finite()
    }
}

/// Provider of heliocentric ecliptic coordinates.
///
/// Implementations must be pure functions of `(body, jd)`; the engine calls them from
/// worker threads, hence the `Send + Sync` bound.
pub trait HeliocentricEphemeris: Send + Sync {
    /// Heliocentric ecliptic J2000 coordinates of `body` at Julian date `jd` (UTC).
    fn heliocentric(&self, body: Body, jd: JD) -> Heliocentric;
}

impl<T: HeliocentricEphemeris + ?Sized> HeliocentricEphemeris for &T {
    fn heliocentric(&self, body: Body, jd: JD) -> Heliocentric {
        (**self).heliocentric(body, jd)
    }
}

impl<T: HeliocentricEphemeris + ?Sized> HeliocentricEphemeris for std::sync::Arc<T> {
    fn heliocentric(&self, body: Body, jd: JD) -> Heliocentric {
        (**self).heliocentric(body, jd)
    }
}
