//! # Constants and type definitions for Jovian
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the `jovian` crate.
//!
//! ## Overview
//!
//! - Astronomical constants (AU, light time, solar and Jovian radii)
//! - Unit conversions (degrees ↔ radians, days ↔ seconds/hours)
//! - Jupiter-specific constants (oblateness stretch, System II rotation rate)
//! - Core type aliases used across the crate
//!
//! Per-moon physical data (radii, names) lives on [`Moon`](crate::satellites::Moon).

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of hours in a Julian day
pub const HOURS_PER_DAY: f64 = 24.0;

/// One hour expressed in days
pub const ONE_HOUR: f64 = 1.0 / HOURS_PER_DAY;

/// One second expressed in days
pub const ONE_SECOND: f64 = 1.0 / SECONDS_PER_DAY;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// Light travel time for one astronomical unit, in days
pub const LIGHT_TIME_PER_AU: f64 = 0.005_775_518_3;

/// Julian date of J2000.0 (2000-01-01 12:00:00 TT)
pub const J2000: f64 = 2_451_545.0;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2400000.5;

/// Days per Julian century
pub const DAYS_PER_CENTURY: f64 = 36525.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Earth equatorial radius in meters (GRS1980/WGS84)
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Earth polar radius in meters (GRS1980/WGS84)
pub const EARTH_MINOR_AXIS: f64 = 6_356_752.3;

/// Equatorial horizontal parallax of a body at 1 AU, in arcseconds
pub const PARALLAX_1AU: f64 = 8.794;

/// Constant of annual aberration, in arcseconds
pub const ABERRATION_CONSTANT: f64 = 20.49552;

/// Solar radius in kilometers
pub const SUN_RADIUS: Kilometer = 696_000.0;

// -------------------------------------------------------------------------------------------------
// Jupiter
// -------------------------------------------------------------------------------------------------

/// Jupiter equatorial radius in kilometers
pub const JUPITER_RADIUS: Kilometer = 71_492.0;

/// Squared equatorial/polar radius ratio of Jupiter.
///
/// A point `(X, Y)` of the sky plane, in equatorial radii, lies inside Jupiter's
/// projected disk iff `X² + Y²·STRETCH < 1`.
pub const STRETCH: f64 = 1.14784224788;

/// Rotation rate of Jupiter's System II, in degrees per day
pub const SYSTEM_II_RATE: f64 = 870.1869147;

/// Rotation period of Jupiter's System II, in days
pub const SYSTEM_II_PERIOD: f64 = 360.0 / SYSTEM_II_RATE;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Julian Date (days, UTC unless stated otherwise)
pub type JD = f64;
