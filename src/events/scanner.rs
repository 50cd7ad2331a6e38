//! # Hourly event scanner
//!
//! The scanner walks the month in fixed steps (one hour by default), evaluating the
//! moon/shadow frame at each step and comparing it with the previous one. A change of
//! sign of a coordinate between two steps brackets a crossing, which is then refined
//! with [`find_root`].
//!
//! ## Jupiter phenomena
//!
//! For each moon and each view (disk, shadow), a sign change of `X` means the body
//! crosses the line through Jupiter's centre. The crossing `c` is refined on the step
//! bracket, the sign of `Z` at `c` tells behind (occultation/eclipse) from in front
//! (transit/shadow transit), and the contacts are the roots of
//!
//! ```text
//! touch(jd) = sqrt(X² + Y²·STRETCH) − 1 − r_moon
//! ```
//!
//! on `[c − w, c]` and `[c, c + w]` with `w = self_window`. A missing root on either
//! side means the body misses the disk and the candidate is dropped.
//!
//! ## Mutual events
//!
//! For each ordered pair `(front, target)` and each view, a sign change of
//! `X_front − X_target` is refined the same way. The candidate is kept when `front`
//! is nearer to the viewpoint (`Z_front ≤ Z_target`) and the separation at the
//! crossing is smaller than the combined radii:
//!
//! * disks: `r_front + r_target`,
//! * shadows: semidiameter of the shadow of `front` at the target plus `r_target`.
//!
//! Contacts are the roots of `separation − combined` on `[c − w, c]` and `[c, c + w]`
//! with `w = mutual_window`.
//!
//! ## Cancellation
//!
//! A [`CancellationToken`] is polled once per step; a cancelled scan returns
//! [`JovianError::Cancelled`] and no partial result.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use itertools::iproduct;
use log::{debug, trace};

use crate::{
    body_positions::BodyPositions,
    constants::{JD, ONE_SECOND},
    events::{
        classifier::{mutual_event_kind, self_event_kind, Crossing},
        SearchParams,
    },
    jovian_errors::JovianError,
    root_finder::{find_root, ScalarFn},
    satellites::{limb_distance, Moon, MoonFrame, SatelliteTheory, ViewKind},
    span::MonthSpan,
};

/// Shared flag used to stop a running scan from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// `X` of one body: zero when it crosses the line through Jupiter's centre.
struct CrossingX<'a, S: SatelliteTheory + ?Sized> {
    bodies: &'a BodyPositions<'a, S>,
    moon: Moon,
    view: ViewKind,
}

impl<S: SatelliteTheory + ?Sized> ScalarFn for CrossingX<'_, S> {
    fn eval(&self, jd: f64) -> f64 {
        self.bodies.frame(jd).get(self.moon, self.view).x
    }
}

/// Distance from the body's limb to Jupiter's limb: zero at first/last contact.
struct SelfTouch<'a, S: SatelliteTheory + ?Sized> {
    bodies: &'a BodyPositions<'a, S>,
    moon: Moon,
    view: ViewKind,
}

impl<S: SatelliteTheory + ?Sized> ScalarFn for SelfTouch<'_, S> {
    fn eval(&self, jd: f64) -> f64 {
        let p = *self.bodies.frame(jd).get(self.moon, self.view);
        limb_distance(p.x, p.y) - 1.0 - self.moon.relative_radius()
    }
}

/// `X_front − X_target`.
struct MutualCrossing<'a, S: SatelliteTheory + ?Sized> {
    bodies: &'a BodyPositions<'a, S>,
    front: Moon,
    target: Moon,
    view: ViewKind,
}

impl<S: SatelliteTheory + ?Sized> ScalarFn for MutualCrossing<'_, S> {
    fn eval(&self, jd: f64) -> f64 {
        let frame = self.bodies.frame(jd);
        frame.get(self.front, self.view).x - frame.get(self.target, self.view).x
    }
}

/// Separation minus combined radii of two bodies: zero at first/last contact.
struct MutualTouch<'a, S: SatelliteTheory + ?Sized> {
    bodies: &'a BodyPositions<'a, S>,
    front: Moon,
    target: Moon,
    view: ViewKind,
}

impl<S: SatelliteTheory + ?Sized> MutualTouch<'_, S> {
    /// Separation and combined radii at `jd`, in Jupiter radii.
    fn geometry(&self, jd: JD) -> (f64, f64) {
        let frame = self.bodies.frame(jd);
        let front = frame.get(self.front, self.view);
        let target = frame.get(self.target, self.view);

        let separation = (front.x - target.x).hypot(front.y - target.y);
        let combined = match self.view {
            ViewKind::Disk => self.front.relative_radius() + self.target.relative_radius(),
            ViewKind::Shadow => {
                self.bodies.theory().shadow_semidiameter(
                    self.bodies.sun_distance(jd),
                    self.bodies.earth_distance(jd),
                    self.front,
                    front,
                    target,
                ) + self.target.relative_radius()
            }
        };
        (separation, combined)
    }
}

impl<S: SatelliteTheory + ?Sized> ScalarFn for MutualTouch<'_, S> {
    fn eval(&self, jd: f64) -> f64 {
        let (separation, combined) = self.geometry(jd);
        separation - combined
    }
}

#[inline]
fn sign_changed(prev: f64, cur: f64) -> bool {
    (prev < 0.0) != (cur < 0.0)
}

/// Hourly walk of a month looking for satellite phenomena.
pub struct EventScanner<'a, S: SatelliteTheory + ?Sized> {
    bodies: &'a BodyPositions<'a, S>,
    params: &'a SearchParams,
}

impl<'a, S: SatelliteTheory + ?Sized> EventScanner<'a, S> {
    pub fn new(bodies: &'a BodyPositions<'a, S>, params: &'a SearchParams) -> Self {
        EventScanner { bodies, params }
    }

    /// Contacts around `center` for a touch predicate, if both exist.
    fn contacts<F: ScalarFn>(&self, touch: &F, center: JD, window: f64) -> Option<(JD, JD)> {
        let eps = self.params.root_eps;
        let begin = find_root(touch, center - window, center, eps)?;
        let end = find_root(touch, center, center + window, eps)?;
        (begin < end).then_some((begin, end))
    }

    /// Refine a Jupiter phenomenon bracketed by `[jd0, jd1]`.
    pub fn self_event(&self, moon: Moon, view: ViewKind, jd0: JD, jd1: JD) -> Option<Crossing> {
        let crossing = CrossingX {
            bodies: self.bodies,
            moon,
            view,
        };
        let center = find_root(&crossing, jd0, jd1, self.params.root_eps)?;
        let z = self.bodies.frame(center).get(moon, view).z;
        let kind = self_event_kind(view, z);

        let touch = SelfTouch {
            bodies: self.bodies,
            moon,
            view,
        };
        let Some((jd_begin, jd_end)) = self.contacts(&touch, center, self.params.self_window)
        else {
            trace!("{moon} {kind} at JD {center:.5} misses Jupiter's disk");
            return None;
        };

        Some(Crossing {
            jd_begin,
            jd_max: center,
            jd_end,
            moon,
            by_moon: None,
            kind,
        })
    }

    /// Refine a mutual event of `front` on `target` bracketed by `[jd0, jd1]`.
    pub fn mutual_event(
        &self,
        front: Moon,
        target: Moon,
        view: ViewKind,
        jd0: JD,
        jd1: JD,
    ) -> Option<Crossing> {
        let crossing = MutualCrossing {
            bodies: self.bodies,
            front,
            target,
            view,
        };
        let center = find_root(&crossing, jd0, jd1, self.params.root_eps)?;

        let frame = self.bodies.frame(center);
        if frame.get(front, view).z > frame.get(target, view).z {
            return None;
        }

        let touch = MutualTouch {
            bodies: self.bodies,
            front,
            target,
            view,
        };
        let (separation, combined) = touch.geometry(center);
        if separation >= combined {
            return None;
        }

        let kind = mutual_event_kind(view);
        let Some((jd_begin, jd_end)) = self.contacts(&touch, center, self.params.mutual_window)
        else {
            trace!("{front} {kind} on {target} at JD {center:.5}: contacts not bracketed");
            return None;
        };

        Some(Crossing {
            jd_begin,
            jd_max: center,
            jd_end,
            moon: target,
            by_moon: Some(front),
            kind,
        })
    }

    /// Candidates detected between two consecutive frames.
    fn step_candidates(
        &self,
        prev: &MoonFrame,
        cur: &MoonFrame,
        jd0: JD,
        jd1: JD,
        out: &mut Vec<Crossing>,
    ) {
        for (moon, view) in iproduct!(Moon::ALL, ViewKind::ALL) {
            if sign_changed(prev.get(moon, view).x, cur.get(moon, view).x) {
                out.extend(self.self_event(moon, view, jd0, jd1));
            }
        }

        for (front, target, view) in iproduct!(Moon::ALL, Moon::ALL, ViewKind::ALL) {
            if front == target {
                continue;
            }
            let before = prev.get(front, view).x - prev.get(target, view).x;
            let after = cur.get(front, view).x - cur.get(target, view).x;
            if sign_changed(before, after) {
                out.extend(self.mutual_event(front, target, view, jd0, jd1));
            }
        }
    }

    /// Scan `span` and return the refined crossings in scan order.
    ///
    /// Arguments
    /// ---------
    /// * `span`: the window to scan; the model behind `bodies` should be fitted on it.
    /// * `cancel`: optional token polled once per step.
    ///
    /// Return
    /// ------
    /// * every crossing whose contacts could be refined, unfiltered, or
    ///   [`JovianError::Cancelled`].
    pub fn scan(
        &self,
        span: &MonthSpan,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<Crossing>, JovianError> {
        let step = self.params.step;
        let steps = span.steps(step);

        let mut crossings = Vec::new();
        let mut jd_prev = span.begin();
        let mut prev = self.bodies.frame(jd_prev);

        for i in 1..=steps {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                debug!("scan cancelled at step {i}/{steps}");
                return Err(JovianError::Cancelled);
            }

            let jd = span.begin() + i as f64 * step;
            let cur = self.bodies.frame(jd);
            self.step_candidates(&prev, &cur, jd_prev, jd, &mut crossings);

            prev = cur;
            jd_prev = jd;
        }

        debug!(
            "scanned {steps} steps of {:.0} s: {} refined crossings",
            step / ONE_SECOND,
            crossings.len()
        );
        Ok(crossings)
    }
}

#[cfg(test)]
mod scanner_test {
    use super::*;
    use crate::{
        constants::{ONE_HOUR, STRETCH},
        ephemeris::mean_elements::MeanElementsEphemeris,
        events::EventKind,
        position_model::PositionModel,
    };
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;

    /// Io and Europa on straight lines in the `view` slot: Europa passes in front of
    /// Io at `center` (between Io and the Earth for disks, the Sun for shadows).
    struct CrossingLines {
        center: JD,
        io_y: f64,
        view: ViewKind,
    }

    /// Shadow semidiameter returned by [`CrossingLines`]: twice the eclipser's radius.
    const SHADOW_SPREAD: f64 = 2.0;

    impl CrossingLines {
        fn disks(center: JD, io_y: f64) -> Self {
            CrossingLines {
                center,
                io_y,
                view: ViewKind::Disk,
            }
        }

        fn shadows(center: JD, io_y: f64) -> Self {
            CrossingLines {
                center,
                io_y,
                view: ViewKind::Shadow,
            }
        }
    }

    impl SatelliteTheory for CrossingLines {
        fn positions(
            &self,
            jd: JD,
            _earth: &crate::ephemeris::Heliocentric,
            _jupiter: &crate::ephemeris::Heliocentric,
        ) -> MoonFrame {
            let t = jd - self.center;
            let io = Vector3::new(10.0 + 2.0 * t, self.io_y, 1.0);
            let europa = Vector3::new(10.0 - 2.0 * t, 0.0, -1.0);
            let far = |k: f64| Vector3::new(100.0 * k, 0.0, 0.0);
            let slot = |moving: Vector3<f64>, parked: Vector3<f64>| match self.view {
                ViewKind::Disk => [moving, parked],
                ViewKind::Shadow => [parked, moving],
            };
            MoonFrame::new([
                slot(io, far(1.0)),
                slot(europa, far(2.0)),
                [far(3.0), far(3.0)],
                [far(4.0), far(4.0)],
            ])
        }

        fn shadow_semidiameter(
            &self,
            sun_distance: f64,
            earth_distance: f64,
            eclipser: Moon,
            _eclipser_shadow: &Vector3<f64>,
            _target_shadow: &Vector3<f64>,
        ) -> f64 {
            // Both distances come from the fitted model of Jupiter's orbit
            assert!((4.9..5.5).contains(&sun_distance), "{sun_distance}");
            assert!((3.9..6.5).contains(&earth_distance), "{earth_distance}");
            SHADOW_SPREAD * eclipser.relative_radius()
        }
    }

    fn scan_with(theory: &CrossingLines, span: &MonthSpan) -> Vec<Crossing> {
        let model = PositionModel::build(&MeanElementsEphemeris, span).unwrap();
        let bodies = BodyPositions::new(&model, theory);
        let params = SearchParams::default();
        EventScanner::new(&bodies, &params).scan(span, None).unwrap()
    }

    #[test]
    fn test_mutual_occultation() {
        let span = MonthSpan::new(2460400.5, 2.0).unwrap();
        let center = span.begin() + 1.0 + 0.3 * ONE_HOUR;
        let crossings = scan_with(&CrossingLines::disks(center, 0.0), &span);

        assert_eq!(crossings.len(), 1);
        let c = crossings[0];
        assert_eq!(c.kind, EventKind::MutualOccultation);
        assert_eq!(c.moon, Moon::Io);
        assert_eq!(c.by_moon, Some(Moon::Europa));
        assert_abs_diff_eq!(c.jd_max, center, epsilon = ONE_SECOND);

        // Relative speed 4 radii/day, contacts at ±(r_io + r_europa)
        let half = (Moon::Io.relative_radius() + Moon::Europa.relative_radius()) / 4.0;
        assert_abs_diff_eq!(c.jd_begin, center - half, epsilon = 2.0 * ONE_SECOND);
        assert_abs_diff_eq!(c.jd_end, center + half, epsilon = 2.0 * ONE_SECOND);
    }

    #[test]
    fn test_mutual_eclipse() {
        let span = MonthSpan::new(2460400.5, 2.0).unwrap();
        let center = span.begin() + 0.7 + 0.45 * ONE_HOUR;
        let crossings = scan_with(&CrossingLines::shadows(center, 0.0), &span);

        assert_eq!(crossings.len(), 1);
        let c = crossings[0];
        assert_eq!(c.kind, EventKind::MutualEclipse);
        assert_eq!(c.moon, Moon::Io);
        assert_eq!(c.by_moon, Some(Moon::Europa));
        assert_eq!(
            crate::events::classifier::event_code(c.kind, c.moon, c.by_moon),
            "2E1"
        );
        assert_abs_diff_eq!(c.jd_max, center, epsilon = ONE_SECOND);

        // Contacts at ±(shadow semidiameter of Europa + r_io) / relative speed
        let reach = SHADOW_SPREAD * Moon::Europa.relative_radius() + Moon::Io.relative_radius();
        let half = reach / 4.0;
        assert_abs_diff_eq!(c.jd_begin, center - half, epsilon = 2.0 * ONE_SECOND);
        assert_abs_diff_eq!(c.jd_end, center + half, epsilon = 2.0 * ONE_SECOND);
    }

    #[test]
    fn test_mutual_eclipse_needs_the_shadow_spread() {
        // Outside r_europa + r_io but inside 2·r_europa + r_io: only the shadow cone reaches
        let span = MonthSpan::new(2460400.5, 2.0).unwrap();
        let center = span.begin() + 1.0 + 0.2 * ONE_HOUR;
        let offset = 1.5 * Moon::Europa.relative_radius() + Moon::Io.relative_radius();

        let crossings = scan_with(&CrossingLines::shadows(center, offset), &span);
        assert_eq!(crossings.len(), 1);
        assert_eq!(crossings[0].kind, EventKind::MutualEclipse);

        assert!(scan_with(&CrossingLines::disks(center, offset), &span).is_empty());
    }

    #[test]
    fn test_farther_body_cannot_be_in_front() {
        let span = MonthSpan::new(2460400.5, 2.0).unwrap();
        let center = span.begin() + 1.0 + 0.3 * ONE_HOUR;
        let (jd0, jd1) = (center - 0.5 * ONE_HOUR, center + 0.5 * ONE_HOUR);

        for theory in [
            CrossingLines::disks(center, 0.0),
            CrossingLines::shadows(center, 0.0),
        ] {
            let model = PositionModel::build(&MeanElementsEphemeris, &span).unwrap();
            let bodies = BodyPositions::new(&model, &theory);
            let params = SearchParams::default();
            let scanner = EventScanner::new(&bodies, &params);

            // Io has Z = +1, Europa Z = -1: Io is the farther body
            assert!(scanner
                .mutual_event(Moon::Io, Moon::Europa, theory.view, jd0, jd1)
                .is_none());
            let kept = scanner
                .mutual_event(Moon::Europa, Moon::Io, theory.view, jd0, jd1)
                .unwrap();
            assert_eq!(kept.by_moon, Some(Moon::Europa));
            assert_eq!(kept.kind.view(), theory.view);
        }
    }

    #[test]
    fn test_mutual_miss_is_dropped() {
        let span = MonthSpan::new(2460400.5, 2.0).unwrap();
        let center = span.begin() + 1.0;
        assert!(scan_with(&CrossingLines::disks(center, 0.2), &span).is_empty());
        assert!(scan_with(&CrossingLines::shadows(center, 0.2), &span).is_empty());
    }

    #[test]
    fn test_self_event_missing_the_disk() {
        // A moon crossing X = 0 far above the poles
        struct HighPass;
        impl SatelliteTheory for HighPass {
            fn positions(
                &self,
                jd: JD,
                _earth: &crate::ephemeris::Heliocentric,
                _jupiter: &crate::ephemeris::Heliocentric,
            ) -> MoonFrame {
                let x = 4.0 * (jd - 2460400.5 - 0.5);
                let io = Vector3::new(x, 2.0 / STRETCH.sqrt(), 1.0);
                let far = |k: f64| Vector3::new(100.0 * k, 0.0, 0.0);
                MoonFrame::new([
                    [io, far(1.0)],
                    [far(2.0), far(2.5)],
                    [far(3.0), far(3.5)],
                    [far(4.0), far(4.5)],
                ])
            }
            fn shadow_semidiameter(
                &self,
                _: f64,
                _: f64,
                m: Moon,
                _: &Vector3<f64>,
                _: &Vector3<f64>,
            ) -> f64 {
                m.relative_radius()
            }
        }

        let span = MonthSpan::new(2460400.5, 1.0).unwrap();
        let model = PositionModel::build(&MeanElementsEphemeris, &span).unwrap();
        let bodies = BodyPositions::new(&model, &HighPass);
        let params = SearchParams::default();
        let scanner = EventScanner::new(&bodies, &params);

        assert!(scanner.scan(&span, None).unwrap().is_empty());
        assert!(scanner
            .self_event(Moon::Io, ViewKind::Disk, span.begin(), span.end())
            .is_none());
    }

    #[test]
    fn test_cancelled_scan() {
        let span = MonthSpan::new(2460400.5, 2.0).unwrap();
        let model = PositionModel::build(&MeanElementsEphemeris, &span).unwrap();
        let theory = CrossingLines::disks(span.begin() + 1.0, 0.0);
        let bodies = BodyPositions::new(&model, &theory);
        let params = SearchParams::default();

        let token = CancellationToken::new();
        token.cancel();
        assert!(token.is_cancelled());
        assert_eq!(
            EventScanner::new(&bodies, &params).scan(&span, Some(&token)),
            Err(JovianError::Cancelled)
        );
    }

    #[test]
    fn test_sign_changed() {
        assert!(sign_changed(-1.0, 1.0));
        assert!(!sign_changed(1.0, -0.0));
        assert!(sign_changed(-1.0, 0.0));
        assert!(!sign_changed(2.0, 3.0));
    }
}
