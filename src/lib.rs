//! # jovian
//!
//! Prediction of the phenomena of Jupiter's Galilean satellites for an observer:
//! occultations, eclipses, transits and shadow transits, mutual occultations and
//! eclipses between moons, and Great Red Spot transits.
//!
//! The engine samples a heliocentric ephemeris a few times per month, fits a
//! polynomial model of the Earth and Jupiter, walks the month hour by hour through a
//! satellite theory and refines every sign change with a bisection solver.
//!
//! Both providers are traits ([`HeliocentricEphemeris`], [`SatelliteTheory`]); the
//! crate ships low-precision implementations of each so that it works standalone.
//!
//! ```rust,no_run
//! use jovian::{GeoLocation, JovianCalculator, MonthSpan};
//!
//! let calc = JovianCalculator::builtin();
//! let site = GeoLocation::new(-70.73, -29.26, 2400.0, -4.0).unwrap();
//! let span = MonthSpan::from_calendar(2025, 3, site.utc_offset()).unwrap();
//! let events = calc.events(&span, &site, None).unwrap();
//! println!("{} events", events.len());
//! ```

pub mod body_positions;
pub mod calculator;
pub mod constants;
pub mod earth_orientation;
pub mod ephemeris;
pub mod events;
pub mod export;
pub mod grs;
pub mod horizontal;
pub mod jovian_errors;
pub mod observer;
pub mod position_model;
pub mod root_finder;
pub mod satellites;
pub mod span;
pub mod time;

pub use calculator::{JovianCalculator, PositionRecord};
pub use ephemeris::{mean_elements::MeanElementsEphemeris, Body, Heliocentric, HeliocentricEphemeris};
pub use events::{scanner::CancellationToken, EventKind, JovianEvent, SearchParams};
pub use grs::{GreatRedSpotSettings, GrsEvent};
pub use jovian_errors::JovianError;
pub use observer::GeoLocation;
pub use satellites::{mean_orbits::MeanOrbitTheory, Moon, MoonFrame, SatelliteTheory, ViewKind};
pub use span::MonthSpan;
