//! # Satellite phenomena
//!
//! This module holds the event records produced by the monthly scan and the
//! parameters that drive it.
//!
//! ## Event kinds
//!
//! | Kind                | Code  | Geometry                                                |
//! |---------------------|-------|---------------------------------------------------------|
//! | Occultation         | `O1`  | the moon passes behind Jupiter's disk (seen from Earth) |
//! | Eclipse             | `E1`  | the moon enters Jupiter's shadow                        |
//! | Transit             | `T1`  | the moon crosses in front of Jupiter's disk             |
//! | Shadow transit      | `S1`  | the moon's shadow falls on Jupiter's disk               |
//! | Mutual occultation  | `2O1` | Europa passes in front of Io                            |
//! | Mutual eclipse      | `2E1` | Europa's shadow falls on Io                             |
//!
//! The digit after the letter is the number of the moon the event happens to;
//! for mutual events the leading digit is the moon in front.
//!
//! ## Pipeline
//!
//! 1. [`scanner`]: hourly walk of the month, sign-change detection, root refinement.
//! 2. [`classifier`]: typed [`JovianEvent`] with boundary flags and altitudes.
//! 3. [`retain_observable`]: drop events straddling the window or hidden at both
//!    boundaries, sort by begin time.
//!
//! ## See also
//! * [`JovianCalculator::events`](crate::calculator::JovianCalculator::events) – public entry point.

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{JD, ONE_HOUR, ONE_SECOND},
    horizontal::Altitudes,
    jovian_errors::JovianError,
    satellites::{Moon, ViewKind},
    span::MonthSpan,
};

pub mod classifier;
pub mod scanner;

/// Kind of satellite phenomenon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Occultation,
    Eclipse,
    Transit,
    ShadowTransit,
    MutualOccultation,
    MutualEclipse,
}

impl EventKind {
    /// Letter used in event codes.
    pub fn letter(self) -> char {
        match self {
            EventKind::Occultation | EventKind::MutualOccultation => 'O',
            EventKind::Eclipse | EventKind::MutualEclipse => 'E',
            EventKind::Transit => 'T',
            EventKind::ShadowTransit => 'S',
        }
    }

    pub fn is_mutual(self) -> bool {
        matches!(self, EventKind::MutualOccultation | EventKind::MutualEclipse)
    }

    /// Viewpoint whose positions define the event.
    pub fn view(self) -> ViewKind {
        match self {
            EventKind::Occultation | EventKind::Transit | EventKind::MutualOccultation => {
                ViewKind::Disk
            }
            EventKind::Eclipse | EventKind::ShadowTransit | EventKind::MutualEclipse => {
                ViewKind::Shadow
            }
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventKind::Occultation => "occultation",
            EventKind::Eclipse => "eclipse",
            EventKind::Transit => "transit",
            EventKind::ShadowTransit => "shadow transit",
            EventKind::MutualOccultation => "mutual occultation",
            EventKind::MutualEclipse => "mutual eclipse",
        };
        f.write_str(name)
    }
}

/// One detected satellite phenomenon.
///
/// `is_eclipsed_at_begin` / `is_eclipsed_at_end` tell whether the moon is hidden
/// at the boundary in a way that makes the boundary unobservable:
/// * occultation: the moon is in Jupiter's shadow,
/// * eclipse: the moon is behind Jupiter's disk,
/// * transits: always `false`,
/// * mutual events: the target moon is occulted or eclipsed by Jupiter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JovianEvent {
    pub jd_begin: JD,
    /// Central crossing instant.
    pub jd_max: JD,
    pub jd_end: JD,
    /// Moon the event happens to (the target for mutual events).
    pub moon: Moon,
    /// Moon in front (or casting the shadow) for mutual events.
    pub by_moon: Option<Moon>,
    pub kind: EventKind,
    pub code: String,
    pub description: String,
    pub is_eclipsed_at_begin: bool,
    pub is_eclipsed_at_end: bool,
    pub alt_begin: Altitudes,
    pub alt_end: Altitudes,
}

impl JovianEvent {
    /// Duration in days.
    pub fn duration(&self) -> f64 {
        self.jd_end - self.jd_begin
    }

    /// Hidden at both boundaries: nothing of the event can be observed.
    pub fn is_hidden_throughout(&self) -> bool {
        self.is_eclipsed_at_begin && self.is_eclipsed_at_end
    }
}

/// Final filtering of a scan result.
///
/// Keeps the events fully inside `span` that are visible at one boundary at least,
/// ordered by `jd_begin`.
pub fn retain_observable(events: Vec<JovianEvent>, span: &MonthSpan) -> Vec<JovianEvent> {
    let found = events.len();
    let kept = events
        .into_iter()
        .filter(|e| e.jd_begin >= span.begin() && e.jd_end <= span.end())
        .filter(|e| !e.is_hidden_throughout())
        .sorted_by(|a, b| a.jd_begin.total_cmp(&b.jd_begin))
        .collect_vec();

    debug!(
        "{} events kept out of {} candidates after window and visibility filtering",
        kept.len(),
        found
    );
    kept
}

/// Tuning of the monthly event scan.
///
/// All durations are in **days**. The defaults reproduce the usual almanac settings:
/// one-hour scan, ±3 h refinement for Jupiter phenomena, ±1 h for mutual events,
/// one-second root tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Scan step.
    pub step: f64,
    /// Half-width of the contact search window around a Jupiter phenomenon.
    pub self_window: f64,
    /// Half-width of the contact search window around a mutual event.
    pub mutual_window: f64,
    /// Bisection stopping width.
    pub root_eps: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            step: ONE_HOUR,
            self_window: 3.0 * ONE_HOUR,
            mutual_window: ONE_HOUR,
            root_eps: ONE_SECOND,
        }
    }
}

impl SearchParams {
    /// Start a validated builder from the defaults.
    ///
    /// ```rust
    /// use jovian::events::SearchParams;
    /// use jovian::constants::ONE_HOUR;
    ///
    /// let params = SearchParams::builder()
    ///     .step(ONE_HOUR / 2.0)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(params.step, ONE_HOUR / 2.0);
    /// ```
    pub fn builder() -> SearchParamsBuilder {
        SearchParamsBuilder::new()
    }
}

/// Builder for [`SearchParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct SearchParamsBuilder {
    params: SearchParams,
}

impl SearchParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: SearchParams::default(),
        }
    }

    pub fn step(mut self, v: f64) -> Self {
        self.params.step = v;
        self
    }
    pub fn self_window(mut self, v: f64) -> Self {
        self.params.self_window = v;
        self
    }
    pub fn mutual_window(mut self, v: f64) -> Self {
        self.params.mutual_window = v;
        self
    }
    pub fn root_eps(mut self, v: f64) -> Self {
        self.params.root_eps = v;
        self
    }

    #[inline]
    fn gt0(x: f64) -> bool {
        x.is_finite() && x > 0.0
    }

    /// Validate and return the parameters.
    ///
    /// Errors
    /// ----------
    /// * [`JovianError::InvalidSearchParams`] if a duration is not finite and
    ///   positive, if the step exceeds one day, or if the tolerance is not smaller
    ///   than the step.
    pub fn build(self) -> Result<SearchParams, JovianError> {
        let p = self.params;
        p.validate()?;
        Ok(p)
    }
}

impl SearchParams {
    /// Check the invariants enforced by [`SearchParamsBuilder::build`].
    pub fn validate(&self) -> Result<(), JovianError> {
        if !SearchParamsBuilder::gt0(self.step) || self.step > 1.0 {
            return Err(JovianError::InvalidSearchParams(
                "step must be in (0, 1] day".into(),
            ));
        }
        if !SearchParamsBuilder::gt0(self.self_window)
            || !SearchParamsBuilder::gt0(self.mutual_window)
        {
            return Err(JovianError::InvalidSearchParams(
                "refinement windows must be > 0".into(),
            ));
        }
        if !SearchParamsBuilder::gt0(self.root_eps) || self.root_eps >= self.step {
            return Err(JovianError::InvalidSearchParams(
                "root_eps must be > 0 and smaller than step".into(),
            ));
        }
        Ok(())
    }
}
