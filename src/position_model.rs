//! # Polynomial position model
//!
//! Event detection evaluates the positions of the Earth and of Jupiter thousands of
//! times per month (every hour of the scan plus every bisection step). Rather than
//! calling the ephemeris each time, [`PositionModel::build`] samples it at five
//! evenly spaced instants across the month and fits, for each of the six series
//!
//! ```text
//! Earth   L, B, R
//! Jupiter L, B, R
//! ```
//!
//! a degree-3 least-squares polynomial in the normalized time
//! `t = (jd − begin) / (end − begin) · 4 ∈ [0, 4]`.
//!
//! Longitude series are unwrapped before fitting so that a crossing of 0°/360°
//! inside the month does not create a discontinuity. Evaluation is a Horner
//! scheme, O(degree) per call; evaluating outside `[begin, end]` extrapolates.
//!
//! The least-squares solution uses the pseudo-inverse of the fixed 5×4
//! Vandermonde matrix of the sample indices, computed through an SVD.

use log::debug;
use nalgebra::{SMatrix, SVector, Vector4};

use crate::{
    constants::JD,
    ephemeris::{Body, Heliocentric, HeliocentricEphemeris},
    jovian_errors::JovianError,
    span::MonthSpan,
};

/// Number of ephemeris samples across the fitted interval.
const SAMPLES: usize = 5;

/// Cubic coefficients `c0 + c1·t + c2·t² + c3·t³`.
type Cubic = Vector4<f64>;

/// Least-squares cubic interpolation of the heliocentric positions of the Earth and
/// Jupiter over one month.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionModel {
    begin: JD,
    end: JD,
    earth: [Cubic; 3],
    jupiter: [Cubic; 3],
}

/// Shift each longitude by whole turns so that consecutive samples never differ by
/// more than 180°.
pub(crate) fn unwrap_degrees(series: &mut [f64]) {
    for i in 1..series.len() {
        let jump = series[i] - series[i - 1];
        series[i] -= 360.0 * (jump / 360.0).round();
    }
}

/// Evaluate a cubic with Horner's scheme.
#[inline]
fn horner(c: &Cubic, t: f64) -> f64 {
    ((c[3] * t + c[2]) * t + c[1]) * t + c[0]
}

impl PositionModel {
    /// Sample the ephemeris over `span` and fit the six series.
    ///
    /// Arguments
    /// -----------------
    /// * `ephemeris`: heliocentric coordinates provider.
    /// * `span`: the month to fit.
    ///
    /// Return
    /// ----------
    /// * The fitted model, or [`JovianError::InvalidEphemeris`] if a sample is not finite.
    pub fn build<E>(ephemeris: &E, span: &MonthSpan) -> Result<Self, JovianError>
    where
        E: HeliocentricEphemeris + ?Sized,
    {
        let begin = span.begin();
        let end = span.end();

        let mut earth = [[0.0; SAMPLES]; 3];
        let mut jupiter = [[0.0; SAMPLES]; 3];

        for i in 0..SAMPLES {
            let jd = begin + (end - begin) * i as f64 / (SAMPLES - 1) as f64;
            for (body, series) in [(Body::Earth, &mut earth), (Body::Jupiter, &mut jupiter)] {
                let h = ephemeris.heliocentric(body, jd);
                if !h.is_finite() {
                    return Err(JovianError::InvalidEphemeris(jd));
                }
                series[0][i] = h.l;
                series[1][i] = h.b;
                series[2][i] = h.r;
            }
        }

        unwrap_degrees(&mut earth[0]);
        unwrap_degrees(&mut jupiter[0]);

        let pinv = vandermonde_pseudo_inverse()?;
        let fit = |samples: &[f64; SAMPLES]| -> Cubic { pinv * SVector::from(*samples) };

        let model = PositionModel {
            begin,
            end,
            earth: [fit(&earth[0]), fit(&earth[1]), fit(&earth[2])],
            jupiter: [fit(&jupiter[0]), fit(&jupiter[1]), fit(&jupiter[2])],
        };

        debug!(
            "position model fitted over JD {begin:.5}..{end:.5}: Jupiter L {:.4}°→{:.4}°",
            jupiter[0][0],
            jupiter[0][SAMPLES - 1]
        );

        Ok(model)
    }

    pub fn begin(&self) -> JD {
        self.begin
    }

    pub fn end(&self) -> JD {
        self.end
    }

    /// Normalized time `t ∈ [0, 4]` for `jd` inside the fitted interval.
    #[inline]
    fn normalized_time(&self, jd: JD) -> f64 {
        (jd - self.begin) / (self.end - self.begin) * (SAMPLES - 1) as f64
    }

    /// Heliocentric coordinates of the Earth and Jupiter at `jd`.
    pub fn evaluate(&self, jd: JD) -> (Heliocentric, Heliocentric) {
        let t = self.normalized_time(jd);
        let eval = |series: &[Cubic; 3]| {
            Heliocentric::new(
                horner(&series[0], t).rem_euclid(360.0),
                horner(&series[1], t),
                horner(&series[2], t),
            )
        };
        (eval(&self.earth), eval(&self.jupiter))
    }
}

/// Pseudo-inverse of the Vandermonde matrix of the sample indices 0..4.
fn vandermonde_pseudo_inverse() -> Result<SMatrix<f64, 4, SAMPLES>, JovianError> {
    let vandermonde =
        SMatrix::<f64, SAMPLES, 4>::from_fn(|row, col| (row as f64).powi(col as i32));
    vandermonde
        .pseudo_inverse(1e-12)
        .map_err(JovianError::PolynomialFit)
}
