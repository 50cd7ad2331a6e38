#![allow(dead_code)]

use std::f64::consts::TAU;

use approx::assert_abs_diff_eq;
use jovian::{
    constants::JD, Heliocentric, JovianEvent, Moon, MoonFrame, MonthSpan, SatelliteTheory,
};
use nalgebra::Vector3;

/// Where the stub puts Io's shadow.
#[derive(Debug, Clone, Copy)]
pub enum ShadowPlacement {
    /// Far to the side of Jupiter, never eclipsed.
    Far,
    /// Fixed inside Jupiter's shadow for the whole window.
    Inside,
    /// Moving up along `X = 0`: inside the shadow before the centre, out shortly after.
    Sweeping,
}

/// Satellite theory where Io swings behind Jupiter with `X = A·sin(2π(jd − c)/P)`.
///
/// Io stays at `Y = 0`, `Z = +1`; the other moons sit far away at constant
/// positions so that no other phenomenon can occur.
#[derive(Debug, Clone, Copy)]
pub struct SineOccultation {
    pub center: JD,
    pub amplitude: f64,
    pub period: f64,
    pub shadow: ShadowPlacement,
}

impl SineOccultation {
    pub fn new(center: JD, shadow: ShadowPlacement) -> Self {
        SineOccultation {
            center,
            amplitude: 20.0,
            period: 4.0,
            shadow,
        }
    }

    /// Analytic duration between first and last contact, in days.
    pub fn expected_width(&self) -> f64 {
        let half_angle = ((1.0 + Moon::Io.relative_radius()) / self.amplitude).asin();
        2.0 * half_angle * self.period / TAU
    }
}

impl SatelliteTheory for SineOccultation {
    fn positions(&self, jd: JD, _earth: &Heliocentric, _jupiter: &Heliocentric) -> MoonFrame {
        let t = jd - self.center;
        let disk = Vector3::new(self.amplitude * (TAU * t / self.period).sin(), 0.0, 1.0);
        let shadow = match self.shadow {
            ShadowPlacement::Far => Vector3::new(10.0, 0.0, 1.0),
            ShadowPlacement::Inside => Vector3::new(0.0, 0.0, 1.0),
            ShadowPlacement::Sweeping => Vector3::new(0.0, 0.5 + 20.0 * t, 1.0),
        };
        let parked = |k: f64| {
            [
                Vector3::new(100.0 * k, 0.0, 0.0),
                Vector3::new(100.0 * k + 50.0, 0.0, 0.0),
            ]
        };

        MoonFrame::new([[disk, shadow], parked(2.0), parked(3.0), parked(4.0)])
    }

    fn shadow_semidiameter(
        &self,
        _sun_distance: f64,
        _earth_distance: f64,
        eclipser: Moon,
        _eclipser_shadow: &Vector3<f64>,
        _target_shadow: &Vector3<f64>,
    ) -> f64 {
        eclipser.relative_radius()
    }
}

/// One-day window with the stub centre off the hourly grid.
pub fn one_day_window() -> (MonthSpan, JD) {
    let span = MonthSpan::new(2460400.5, 1.0).unwrap();
    let center = span.begin() + 0.5 + 0.37 / 24.0;
    (span, center)
}

/// Ordering, finiteness and window invariants every event list must satisfy.
pub fn assert_event_invariants(events: &[JovianEvent], span: &MonthSpan) {
    for event in events {
        assert!(event.jd_begin.is_finite() && event.jd_end.is_finite());
        assert!(event.jd_begin < event.jd_max, "{event:?}");
        assert!(event.jd_max < event.jd_end, "{event:?}");
        assert!(event.jd_begin >= span.begin() && event.jd_end <= span.end());
        assert!(!(event.is_eclipsed_at_begin && event.is_eclipsed_at_end));
        assert!(event.alt_begin.sun.abs() <= 90.0 && event.alt_end.jupiter.abs() <= 90.0);
    }
    for pair in events.windows(2) {
        assert!(pair[0].jd_begin <= pair[1].jd_begin);
    }
}

pub fn assert_same_instant(actual: JD, expected: JD, seconds: f64) {
    assert_abs_diff_eq!(actual, expected, epsilon = seconds / 86_400.0);
}
