//! # Galilean satellites and their shadows
//!
//! This module defines the data exchanged with a satellite theory:
//!
//! - [`Moon`]: the four Galilean moons with their static physical data,
//! - [`ViewKind`]: whether a position describes the moon disk as seen from the Earth
//!   or the moon as seen from the Sun (i.e. its shadow),
//! - [`MoonFrame`]: the 4×2 matrix of rectangular positions at one instant,
//! - [`SatelliteTheory`]: the provider contract.
//!
//! ## Frame convention
//!
//! Positions are planetocentric, in units of Jupiter's **equatorial radius**, in a
//! sky-plane frame attached to the viewpoint (Earth for [`ViewKind::Disk`], Sun for
//! [`ViewKind::Shadow`]):
//!
//! ```text
//! Z : along the line of sight, positive away from the viewpoint (behind Jupiter)
//! Y : projection of Jupiter's north pole on the sky plane
//! X : completes a right-handed frame (X = Y × Z)
//! ```
//!
//! `Y` is **not** pre-scaled for Jupiter's flattening; the oblateness correction
//! [`STRETCH`] is applied once, in [`inside_disk`].

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{AstronomicalUnit, Kilometer, JD, JUPITER_RADIUS, STRETCH},
    ephemeris::Heliocentric,
};

pub mod mean_orbits;

/// One of the four Galilean moons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Moon {
    Io,
    Europa,
    Ganymede,
    Callisto,
}

impl Moon {
    pub const ALL: [Moon; 4] = [Moon::Io, Moon::Europa, Moon::Ganymede, Moon::Callisto];

    /// Zero-based index used by [`MoonFrame`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Conventional moon number, 1 (Io) to 4 (Callisto).
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_number(number: u8) -> Option<Moon> {
        match number {
            1 => Some(Moon::Io),
            2 => Some(Moon::Europa),
            3 => Some(Moon::Ganymede),
            4 => Some(Moon::Callisto),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Moon::Io => "Io",
            Moon::Europa => "Europa",
            Moon::Ganymede => "Ganymede",
            Moon::Callisto => "Callisto",
        }
    }

    /// Mean physical radius in kilometers.
    pub fn radius(self) -> Kilometer {
        match self {
            Moon::Io => 1821.6,
            Moon::Europa => 1560.8,
            Moon::Ganymede => 2631.2,
            Moon::Callisto => 2410.3,
        }
    }

    /// Radius in units of Jupiter's equatorial radius.
    pub fn relative_radius(self) -> f64 {
        self.radius() / JUPITER_RADIUS
    }
}

impl std::fmt::Display for Moon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Viewpoint of a position entry: the moon disk seen from the Earth, or the moon
/// seen from the Sun, which locates its shadow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKind {
    Disk,
    Shadow,
}

impl ViewKind {
    pub const ALL: [ViewKind; 2] = [ViewKind::Disk, ViewKind::Shadow];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Oblate-disk containment test for a sky-plane point in Jupiter equatorial radii.
#[inline]
pub fn inside_disk(x: f64, y: f64) -> bool {
    limb_distance(x, y) < 1.0
}

/// Stretched radial distance `sqrt(X² + Y²·STRETCH)`; equals 1 on Jupiter's limb.
#[inline]
pub fn limb_distance(x: f64, y: f64) -> f64 {
    (x * x + y * y * STRETCH).sqrt()
}

/// Rectangular positions of the four moons (rows) for both viewpoints (columns)
/// at a single instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonFrame {
    positions: [[Vector3<f64>; 2]; 4],
}

impl MoonFrame {
    pub fn new(positions: [[Vector3<f64>; 2]; 4]) -> Self {
        MoonFrame { positions }
    }

    #[inline]
    pub fn get(&self, moon: Moon, kind: ViewKind) -> &Vector3<f64> {
        &self.positions[moon.index()][kind.index()]
    }

    /// The moon is behind Jupiter and inside its disk as seen from the Earth.
    pub fn is_occulted(&self, moon: Moon) -> bool {
        let p = self.get(moon, ViewKind::Disk);
        p.z > 0.0 && inside_disk(p.x, p.y)
    }

    /// The moon is inside Jupiter's shadow (behind the disk as seen from the Sun).
    pub fn is_eclipsed(&self, moon: Moon) -> bool {
        let p = self.get(moon, ViewKind::Shadow);
        p.z > 0.0 && inside_disk(p.x, p.y)
    }

    /// The moon cannot be seen: occulted by, or eclipsed in the shadow of, Jupiter.
    pub fn is_hidden(&self, moon: Moon) -> bool {
        self.is_occulted(moon) || self.is_eclipsed(moon)
    }
}

/// Provider of satellite positions.
pub trait SatelliteTheory: Send + Sync {
    /// Moon and shadow rectangular positions at `jd` (UTC), from the heliocentric
    /// positions of the Earth and of Jupiter at that instant.
    fn positions(&self, jd: JD, earth: &Heliocentric, jupiter: &Heliocentric) -> MoonFrame;

    /// Semidiameter of the shadow cast by `eclipser` at the distance of a target,
    /// in Jupiter equatorial radii.
    ///
    /// Arguments
    /// ---------
    /// * `sun_distance`: Sun–Jupiter distance in AU.
    /// * `earth_distance`: Earth–Jupiter distance in AU, for theories that work with
    ///   apparent (angular) sizes.
    /// * `eclipser`: the moon casting the shadow.
    /// * `eclipser_shadow`, `target_shadow`: [`ViewKind::Shadow`] positions of the
    ///   eclipsing moon and of the eclipsed moon.
    fn shadow_semidiameter(
        &self,
        sun_distance: AstronomicalUnit,
        earth_distance: AstronomicalUnit,
        eclipser: Moon,
        eclipser_shadow: &Vector3<f64>,
        target_shadow: &Vector3<f64>,
    ) -> f64;
}

impl<T: SatelliteTheory + ?Sized> SatelliteTheory for &T {
    fn positions(&self, jd: JD, earth: &Heliocentric, jupiter: &Heliocentric) -> MoonFrame {
        (**self).positions(jd, earth, jupiter)
    }

    fn shadow_semidiameter(
        &self,
        sun_distance: AstronomicalUnit,
        earth_distance: AstronomicalUnit,
        eclipser: Moon,
        eclipser_shadow: &Vector3<f64>,
        target_shadow: &Vector3<f64>,
    ) -> f64 {
        (**self).shadow_semidiameter(
            sun_distance,
            earth_distance,
            eclipser,
            eclipser_shadow,
            target_shadow,
        )
    }
}

impl<T: SatelliteTheory + ?Sized> SatelliteTheory for std::sync::Arc<T> {
    fn positions(&self, jd: JD, earth: &Heliocentric, jupiter: &Heliocentric) -> MoonFrame {
        (**self).positions(jd, earth, jupiter)
    }

    fn shadow_semidiameter(
        &self,
        sun_distance: AstronomicalUnit,
        earth_distance: AstronomicalUnit,
        eclipser: Moon,
        eclipser_shadow: &Vector3<f64>,
        target_shadow: &Vector3<f64>,
    ) -> f64 {
        (**self).shadow_semidiameter(
            sun_distance,
            earth_distance,
            eclipser,
            eclipser_shadow,
            target_shadow,
        )
    }
}
