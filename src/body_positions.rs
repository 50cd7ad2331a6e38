use nalgebra::Vector3;

use crate::{
    constants::JD,
    ephemeris::Heliocentric,
    position_model::PositionModel,
    satellites::{Moon, MoonFrame, SatelliteTheory},
};

/// Evaluator of the moon/shadow frame at arbitrary instants of a fitted month.
///
/// Nothing is cached: each query evaluates the [`PositionModel`] and hands the
/// Earth and Jupiter records to the [`SatelliteTheory`].
pub struct BodyPositions<'a, S: SatelliteTheory + ?Sized> {
    model: &'a PositionModel,
    theory: &'a S,
}

impl<'a, S: SatelliteTheory + ?Sized> BodyPositions<'a, S> {
    pub fn new(model: &'a PositionModel, theory: &'a S) -> Self {
        BodyPositions { model, theory }
    }

    pub fn model(&self) -> &PositionModel {
        self.model
    }

    pub fn theory(&self) -> &S {
        self.theory
    }

    /// Heliocentric records of the Earth and Jupiter at `jd`.
    #[inline]
    pub fn heliocentric(&self, jd: JD) -> (Heliocentric, Heliocentric) {
        self.model.evaluate(jd)
    }

    /// The 4×2 moon/shadow matrix at `jd`.
    pub fn frame(&self, jd: JD) -> MoonFrame {
        let (earth, jupiter) = self.model.evaluate(jd);
        self.theory.positions(jd, &earth, &jupiter)
    }

    /// Geocentric ecliptic rectangular position of Jupiter in AU.
    pub fn geocentric_jupiter(&self, jd: JD) -> Vector3<f64> {
        let (earth, jupiter) = self.model.evaluate(jd);
        jupiter.to_cartesian() - earth.to_cartesian()
    }

    /// Earth–Jupiter distance at `jd`, in AU.
    pub fn earth_distance(&self, jd: JD) -> f64 {
        self.geocentric_jupiter(jd).norm()
    }

    /// Sun–Jupiter distance at `jd`, in AU.
    pub fn sun_distance(&self, jd: JD) -> f64 {
        self.model.evaluate(jd).1.r
    }

    pub fn is_occulted(&self, moon: Moon, jd: JD) -> bool {
        self.frame(jd).is_occulted(moon)
    }

    pub fn is_eclipsed(&self, moon: Moon, jd: JD) -> bool {
        self.frame(jd).is_eclipsed(moon)
    }

    pub fn is_hidden(&self, moon: Moon, jd: JD) -> bool {
        self.frame(jd).is_hidden(moon)
    }
}
