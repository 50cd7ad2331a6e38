//! # Jovian calculator: the public façade
//!
//! [`JovianCalculator`] owns the two providers the engine depends on and the
//! [`SearchParams`] tuning, and exposes the monthly computations:
//!
//! - [`events`](JovianCalculator::events): every satellite phenomenon of the month,
//!   filtered and ordered by begin time,
//! - [`grs_times`](JovianCalculator::grs_times): Great Red Spot transits,
//! - [`positions`](JovianCalculator::positions): hourly table of the moon/shadow frame.
//!
//! Each call fits its own [`PositionModel`] and owns its result: there is no shared
//! mutable state, so one calculator can serve several threads. For async callers,
//! [`spawn_events`](JovianCalculator::spawn_events) and
//! [`spawn_grs_times`](JovianCalculator::spawn_grs_times) run the same work on the
//! tokio blocking pool.
//!
//! ## Typical usage
//!
//! ```rust,no_run
//! use jovian::calculator::JovianCalculator;
//! use jovian::observer::GeoLocation;
//! use jovian::span::MonthSpan;
//!
//! let calc = JovianCalculator::builtin();
//! let paris = GeoLocation::new(2.35, 48.85, 35.0, 1.0).unwrap();
//! let span = MonthSpan::from_calendar(2025, 1, paris.utc_offset()).unwrap();
//!
//! for event in calc.events(&span, &paris, None).unwrap() {
//!     println!("{:.5} {:>4} {}", event.jd_begin, event.code, event.description);
//! }
//! ```
//!
//! ## See also
//! ------------
//! * [`EventScanner`] – Hourly search and root refinement.
//! * [`grs_transits`] – Great Red Spot iteration.

use std::sync::Arc;

use log::debug;

use crate::{
    body_positions::BodyPositions,
    constants::JD,
    ephemeris::{mean_elements::MeanElementsEphemeris, HeliocentricEphemeris},
    events::{
        classifier::EventClassifier,
        retain_observable,
        scanner::{CancellationToken, EventScanner},
        JovianEvent, SearchParams,
    },
    grs::{grs_transits, GreatRedSpotSettings, GrsEvent},
    jovian_errors::JovianError,
    observer::GeoLocation,
    position_model::PositionModel,
    satellites::{mean_orbits::MeanOrbitTheory, MoonFrame, SatelliteTheory},
    span::MonthSpan,
};

/// One row of the hourly position table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionRecord {
    pub jd: JD,
    pub frame: MoonFrame,
}

#[derive(Debug, Clone)]
pub struct JovianCalculator<E, S> {
    ephemeris: E,
    theory: S,
    params: SearchParams,
}

impl JovianCalculator<MeanElementsEphemeris, MeanOrbitTheory> {
    /// Calculator on the built-in mean-elements ephemeris and satellite theory.
    pub fn builtin() -> Self {
        JovianCalculator::new(MeanElementsEphemeris, MeanOrbitTheory)
    }
}

impl Default for JovianCalculator<MeanElementsEphemeris, MeanOrbitTheory> {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<E, S> JovianCalculator<E, S>
where
    E: HeliocentricEphemeris,
    S: SatelliteTheory,
{
    /// Build a calculator with the default [`SearchParams`].
    pub fn new(ephemeris: E, theory: S) -> Self {
        JovianCalculator {
            ephemeris,
            theory,
            params: SearchParams::default(),
        }
    }

    /// Replace the search parameters.
    ///
    /// Errors
    /// ----------
    /// * [`JovianError::InvalidSearchParams`] if `params` fails validation (useful
    ///   when they were deserialized rather than built).
    pub fn with_params(mut self, params: SearchParams) -> Result<Self, JovianError> {
        params.validate()?;
        self.params = params;
        Ok(self)
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn ephemeris(&self) -> &E {
        &self.ephemeris
    }

    pub fn theory(&self) -> &S {
        &self.theory
    }

    /// Every observable satellite phenomenon of `span` for `location`.
    ///
    /// Arguments
    /// -----------------
    /// * `span`: scan window, usually [`MonthSpan::from_calendar`].
    /// * `location`: observer, for the altitude context.
    /// * `cancel`: optional token polled once per scan step.
    ///
    /// Return
    /// ----------
    /// * The events fully inside `span`, not hidden at both boundaries, ordered by
    ///   `jd_begin`.
    ///
    /// Errors
    /// ----------
    /// * [`JovianError::InvalidEphemeris`] when the ephemeris returns non-finite samples.
    /// * [`JovianError::Cancelled`] when `cancel` fired during the scan.
    pub fn events(
        &self,
        span: &MonthSpan,
        location: &GeoLocation,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<JovianEvent>, JovianError> {
        let model = PositionModel::build(&self.ephemeris, span)?;
        let bodies = BodyPositions::new(&model, &self.theory);

        let crossings = EventScanner::new(&bodies, &self.params).scan(span, cancel)?;

        let classifier = EventClassifier::new(&bodies, location);
        let events = crossings.iter().map(|c| classifier.classify(c)).collect();

        Ok(retain_observable(events, span))
    }

    /// Great Red Spot central-meridian transits during `span`.
    pub fn grs_times(
        &self,
        span: &MonthSpan,
        location: &GeoLocation,
        settings: &GreatRedSpotSettings,
    ) -> Result<Vec<GrsEvent>, JovianError> {
        let model = PositionModel::build(&self.ephemeris, span)?;
        Ok(grs_transits(&model, span, location, settings))
    }

    /// Moon and shadow positions at every scan step of `span`, both ends included.
    pub fn positions(&self, span: &MonthSpan) -> Result<Vec<PositionRecord>, JovianError> {
        let model = PositionModel::build(&self.ephemeris, span)?;
        let bodies = BodyPositions::new(&model, &self.theory);

        let steps = span.steps(self.params.step);
        let table: Vec<_> = (0..=steps)
            .map(|i| {
                let jd = span.begin() + i as f64 * self.params.step;
                PositionRecord {
                    jd,
                    frame: bodies.frame(jd),
                }
            })
            .collect();

        debug!("position table of {} rows", table.len());
        Ok(table)
    }
}

impl<E, S> JovianCalculator<E, S>
where
    E: HeliocentricEphemeris + 'static,
    S: SatelliteTheory + 'static,
{
    /// [`events`](Self::events) on the tokio blocking pool.
    ///
    /// Errors
    /// ----------
    /// * Same as [`events`](Self::events), plus [`JovianError::Worker`] if the
    ///   blocking task panicked or was aborted.
    pub async fn spawn_events(
        self: Arc<Self>,
        span: MonthSpan,
        location: GeoLocation,
        cancel: Option<CancellationToken>,
    ) -> Result<Vec<JovianEvent>, JovianError> {
        tokio::task::spawn_blocking(move || self.events(&span, &location, cancel.as_ref()))
            .await?
    }

    /// [`grs_times`](Self::grs_times) on the tokio blocking pool.
    pub async fn spawn_grs_times(
        self: Arc<Self>,
        span: MonthSpan,
        location: GeoLocation,
        settings: GreatRedSpotSettings,
    ) -> Result<Vec<GrsEvent>, JovianError> {
        tokio::task::spawn_blocking(move || self.grs_times(&span, &location, &settings)).await?
    }
}

#[cfg(test)]
mod calculator_test {
    use super::*;
    use crate::{constants::ONE_HOUR, satellites::Moon};

    #[test]
    fn test_with_params_validates() {
        let calc = JovianCalculator::builtin();
        let bad = SearchParams {
            step: -1.0,
            ..SearchParams::default()
        };
        assert!(matches!(
            calc.clone().with_params(bad),
            Err(JovianError::InvalidSearchParams(_))
        ));

        let half_hour = SearchParams::builder().step(ONE_HOUR / 2.0).build().unwrap();
        let calc = calc.with_params(half_hour).unwrap();
        assert_eq!(calc.params().step, ONE_HOUR / 2.0);
    }

    #[test]
    fn test_position_table() {
        let calc = JovianCalculator::builtin();
        let span = MonthSpan::new(2460600.5, 2.0).unwrap();
        let table = calc.positions(&span).unwrap();

        assert_eq!(table.len(), 49);
        assert_eq!(table[0].jd, span.begin());
        assert!((table[48].jd - span.end()).abs() < 1e-9);
        assert!(table
            .iter()
            .all(|row| row.frame.get(Moon::Callisto, crate::satellites::ViewKind::Disk).norm() > 26.0));
    }
}
