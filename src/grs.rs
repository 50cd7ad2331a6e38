//! # Great Red Spot transits
//!
//! The Great Red Spot (GRS) crosses Jupiter's central meridian once per System II
//! rotation (≈ 9h55m40s). Its System II longitude drifts slowly, so it is described
//! by a reference longitude at an epoch plus a monthly drift
//! ([`GreatRedSpotSettings`]).
//!
//! For each rotation, starting one period before the month, the transit is found by
//! the fixed-point iteration
//!
//! ```text
//! jd ← jd − Δ / 870.1869147      Δ = CM_II(jd) − λ_GRS(jd)  reduced to (−180°, 180°]
//! ```
//!
//! where `CM_II` is the System II central-meridian longitude from the low-precision
//! closed form (Meeus, *Astronomical Algorithms*, ch. 43) and 870.1869147 °/day the
//! System II rotation rate.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{Degree, JD, ONE_HOUR, ONE_SECOND, RADEG, SYSTEM_II_PERIOD, SYSTEM_II_RATE},
    horizontal::{altitudes, Altitudes},
    observer::GeoLocation,
    position_model::PositionModel,
    span::MonthSpan,
    time::angle_diff_deg,
};

/// Half-width of the visibility window around a transit: the spot is on the
/// Earth-facing hemisphere roughly two hours before and after crossing the meridian.
const VISIBILITY_HALF_WIDTH: f64 = 2.0 * ONE_HOUR;

/// Maximum number of fixed-point iterations per rotation.
const MAX_ITER: usize = 10;

/// Convergence threshold on Δ, in degrees (≈ 0.1 s of rotation).
const TOLERANCE: Degree = 0.1 * ONE_SECOND * SYSTEM_II_RATE;

/// Position of the Great Red Spot in System II.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreatRedSpotSettings {
    /// Julian date at which `longitude` was measured.
    pub epoch: JD,
    /// Drift of the System II longitude, degrees per month (positive = increasing).
    pub monthly_drift: Degree,
    /// System II longitude at `epoch`, degrees.
    pub longitude: Degree,
}

impl Default for GreatRedSpotSettings {
    /// Spot at System II 50° on 2024-01-01 drifting by 1.8°/month.
    fn default() -> Self {
        GreatRedSpotSettings {
            epoch: 2460310.5,
            monthly_drift: 1.8,
            longitude: 50.0,
        }
    }
}

impl GreatRedSpotSettings {
    /// System II longitude of the spot at `jd`, in `[0°, 360°)`.
    pub fn longitude_at(&self, jd: JD) -> Degree {
        let months = (jd - self.epoch) / (365.25 / 12.0);
        (self.longitude + self.monthly_drift * months).rem_euclid(360.0)
    }
}

/// One central-meridian transit of the Great Red Spot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrsEvent {
    pub jd_transit: JD,
    pub jd_appear: JD,
    pub jd_disappear: JD,
    pub alt_transit: Altitudes,
    pub alt_appear: Altitudes,
    pub alt_disappear: Altitudes,
}

/// System II longitude of Jupiter's central meridian at `jd`, in `[0°, 360°)`.
///
/// Low-accuracy closed form: mean anomalies of the Earth and Jupiter, the Earth–Jupiter
/// distance for the light-time, and the phase angle term `ψ`. It is self-contained and
/// does not read the fitted [`PositionModel`].
pub fn central_meridian_ii(jd: JD) -> Degree {
    let sin_deg = |a: f64| (a * RADEG).sin();
    let cos_deg = |a: f64| (a * RADEG).cos();

    let d = jd - 2451545.0;
    let v = 172.74 + 0.00111588 * d;
    let m = 357.529 + 0.9856003 * d;
    let n = 20.020 + 0.0830853 * d + 0.329 * sin_deg(v);
    let j = 66.115 + 0.9025179 * d - 0.329 * sin_deg(v);

    let a = 1.915 * sin_deg(m) + 0.020 * sin_deg(2.0 * m);
    let b = 5.555 * sin_deg(n) + 0.168 * sin_deg(2.0 * n);
    let k = j + a - b;

    let r_earth = 1.00014 - 0.01671 * cos_deg(m) - 0.00014 * cos_deg(2.0 * m);
    let r_jupiter = 5.20872 - 0.25208 * cos_deg(n) - 0.00611 * cos_deg(2.0 * n);
    let delta = (r_jupiter * r_jupiter + r_earth * r_earth
        - 2.0 * r_jupiter * r_earth * cos_deg(k))
    .sqrt();
    let psi = (r_earth / delta * sin_deg(k)).asin() / RADEG;

    (187.23 + 870.1869088 * (d - delta / 173.0) + psi - b).rem_euclid(360.0)
}

/// Refine the transit nearest to `jd` by fixed-point iteration.
fn refine_transit(settings: &GreatRedSpotSettings, mut jd: JD) -> JD {
    for _ in 0..MAX_ITER {
        let delta = angle_diff_deg(central_meridian_ii(jd), settings.longitude_at(jd));
        jd -= delta / SYSTEM_II_RATE;
        if delta.abs() < TOLERANCE {
            break;
        }
    }
    jd
}

/// Every GRS transit inside `span`, in chronological order.
///
/// Arguments
/// ---------
/// * `model`: position model fitted on `span`, used for the altitude context only.
/// * `span`: scan window.
/// * `location`: observer.
/// * `settings`: spot longitude and drift.
pub fn grs_transits(
    model: &PositionModel,
    span: &MonthSpan,
    location: &GeoLocation,
    settings: &GreatRedSpotSettings,
) -> Vec<GrsEvent> {
    let context = |jd: JD| {
        let (earth, jupiter) = model.evaluate(jd);
        altitudes(&earth, &jupiter, jd, location)
    };

    let mut transits = Vec::new();
    let mut guess = span.begin() - SYSTEM_II_PERIOD;
    let mut last: Option<JD> = None;

    while guess <= span.end() + SYSTEM_II_PERIOD {
        let jd = refine_transit(settings, guess);
        guess += SYSTEM_II_PERIOD;

        // Two guesses may converge on the same transit near a wrap of Δ
        if last.is_some_and(|prev| jd - prev < 0.5 * SYSTEM_II_PERIOD) {
            continue;
        }
        last = Some(jd);

        if !span.contains(jd) {
            continue;
        }

        let jd_appear = jd - VISIBILITY_HALF_WIDTH;
        let jd_disappear = jd + VISIBILITY_HALF_WIDTH;
        transits.push(GrsEvent {
            jd_transit: jd,
            jd_appear,
            jd_disappear,
            alt_transit: context(jd),
            alt_appear: context(jd_appear),
            alt_disappear: context(jd_disappear),
        });
    }

    debug!(
        "{} GRS transits between JD {:.5} and {:.5}",
        transits.len(),
        span.begin(),
        span.end()
    );
    transits
}
