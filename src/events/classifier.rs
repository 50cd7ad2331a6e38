//! Packaging of refined crossings into [`JovianEvent`] records.
//!
//! A [`Crossing`] carries what the scanner measured (three instants, the moon, the
//! kind). The [`EventClassifier`] adds the code, the description, the boundary
//! visibility flags and the Sun/Jupiter altitudes for the observer.

use crate::{
    body_positions::BodyPositions,
    constants::JD,
    events::{EventKind, JovianEvent},
    horizontal::{altitudes, Altitudes},
    observer::GeoLocation,
    satellites::{Moon, MoonFrame, SatelliteTheory, ViewKind},
};

/// A refined event before classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub jd_begin: JD,
    pub jd_max: JD,
    pub jd_end: JD,
    pub moon: Moon,
    pub by_moon: Option<Moon>,
    pub kind: EventKind,
}

/// Kind of a Jupiter phenomenon from the viewpoint and the sign of `Z` at the crossing.
///
/// Behind Jupiter (`Z > 0`) a disk crossing is an occultation and a shadow crossing
/// an eclipse; in front, a transit or a shadow transit.
pub fn self_event_kind(view: ViewKind, z: f64) -> EventKind {
    match (view, z > 0.0) {
        (ViewKind::Disk, true) => EventKind::Occultation,
        (ViewKind::Disk, false) => EventKind::Transit,
        (ViewKind::Shadow, true) => EventKind::Eclipse,
        (ViewKind::Shadow, false) => EventKind::ShadowTransit,
    }
}

pub fn mutual_event_kind(view: ViewKind) -> EventKind {
    match view {
        ViewKind::Disk => EventKind::MutualOccultation,
        ViewKind::Shadow => EventKind::MutualEclipse,
    }
}

/// Short almanac code: `O1`, `S3`, or `2O1` for Europa occulting Io.
pub fn event_code(kind: EventKind, moon: Moon, by_moon: Option<Moon>) -> String {
    match by_moon {
        Some(front) if kind.is_mutual() => {
            format!("{}{}{}", front.number(), kind.letter(), moon.number())
        }
        _ => format!("{}{}", kind.letter(), moon.number()),
    }
}

pub fn event_description(kind: EventKind, moon: Moon, by_moon: Option<Moon>) -> String {
    match (kind, by_moon) {
        (EventKind::MutualOccultation, Some(front)) => format!("{front} occults {moon}"),
        (EventKind::MutualEclipse, Some(front)) => format!("{front} eclipses {moon}"),
        _ => format!("{moon} {kind}"),
    }
}

/// Is the boundary of an event of `kind` on `moon` unobservable in `frame`?
pub fn boundary_flag(kind: EventKind, frame: &MoonFrame, moon: Moon) -> bool {
    match kind {
        EventKind::Occultation => frame.is_eclipsed(moon),
        EventKind::Eclipse => frame.is_occulted(moon),
        EventKind::Transit | EventKind::ShadowTransit => false,
        EventKind::MutualOccultation | EventKind::MutualEclipse => frame.is_hidden(moon),
    }
}

/// Turns crossings into annotated events for one observer.
pub struct EventClassifier<'a, S: SatelliteTheory + ?Sized> {
    bodies: &'a BodyPositions<'a, S>,
    location: &'a GeoLocation,
}

impl<'a, S: SatelliteTheory + ?Sized> EventClassifier<'a, S> {
    pub fn new(bodies: &'a BodyPositions<'a, S>, location: &'a GeoLocation) -> Self {
        EventClassifier { bodies, location }
    }

    fn altitudes_at(&self, jd: JD) -> Altitudes {
        let (earth, jupiter) = self.bodies.heliocentric(jd);
        altitudes(&earth, &jupiter, jd, self.location)
    }

    pub fn classify(&self, crossing: &Crossing) -> JovianEvent {
        let Crossing {
            jd_begin,
            jd_max,
            jd_end,
            moon,
            by_moon,
            kind,
        } = *crossing;

        JovianEvent {
            jd_begin,
            jd_max,
            jd_end,
            moon,
            by_moon,
            kind,
            code: event_code(kind, moon, by_moon),
            description: event_description(kind, moon, by_moon),
            is_eclipsed_at_begin: boundary_flag(kind, &self.bodies.frame(jd_begin), moon),
            is_eclipsed_at_end: boundary_flag(kind, &self.bodies.frame(jd_end), moon),
            alt_begin: self.altitudes_at(jd_begin),
            alt_end: self.altitudes_at(jd_end),
        }
    }
}

#[cfg(test)]
mod classifier_test {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_codes() {
        assert_eq!(event_code(EventKind::Occultation, Moon::Io, None), "O1");
        assert_eq!(event_code(EventKind::Eclipse, Moon::Io, None), "E1");
        assert_eq!(event_code(EventKind::Transit, Moon::Ganymede, None), "T3");
        assert_eq!(event_code(EventKind::ShadowTransit, Moon::Callisto, None), "S4");
        assert_eq!(
            event_code(EventKind::MutualOccultation, Moon::Io, Some(Moon::Europa)),
            "2O1"
        );
        assert_eq!(
            event_code(EventKind::MutualEclipse, Moon::Io, Some(Moon::Europa)),
            "2E1"
        );
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(
            event_description(EventKind::ShadowTransit, Moon::Europa, None),
            "Europa shadow transit"
        );
        assert_eq!(
            event_description(EventKind::MutualEclipse, Moon::Io, Some(Moon::Ganymede)),
            "Ganymede eclipses Io"
        );
    }

    #[test]
    fn test_kind_from_z() {
        assert_eq!(self_event_kind(ViewKind::Disk, 3.0), EventKind::Occultation);
        assert_eq!(self_event_kind(ViewKind::Disk, -3.0), EventKind::Transit);
        assert_eq!(self_event_kind(ViewKind::Shadow, 3.0), EventKind::Eclipse);
        assert_eq!(
            self_event_kind(ViewKind::Shadow, -3.0),
            EventKind::ShadowTransit
        );
        assert_eq!(
            mutual_event_kind(ViewKind::Shadow),
            EventKind::MutualEclipse
        );
    }

    #[test]
    fn test_boundary_flags() {
        let far = Vector3::new(40.0, 0.0, 0.0);
        // Io behind the disk and in the shadow
        let hidden = MoonFrame::new([
            [Vector3::new(0.2, 0.0, 5.0), Vector3::new(0.3, 0.0, 5.0)],
            [far, far],
            [far, far],
            [far, far],
        ]);
        assert!(boundary_flag(EventKind::Occultation, &hidden, Moon::Io));
        assert!(boundary_flag(EventKind::Eclipse, &hidden, Moon::Io));
        assert!(!boundary_flag(EventKind::Transit, &hidden, Moon::Io));
        assert!(!boundary_flag(EventKind::ShadowTransit, &hidden, Moon::Io));
        assert!(boundary_flag(EventKind::MutualOccultation, &hidden, Moon::Io));
        assert!(!boundary_flag(EventKind::MutualEclipse, &hidden, Moon::Europa));
    }
}
