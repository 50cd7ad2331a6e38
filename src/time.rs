use hifitime::Epoch;

use crate::constants::{Degree, DAYS_PER_CENTURY, DPI, J2000, JD, JDTOMJD, SECONDS_PER_DAY};
use crate::jovian_errors::JovianError;

/// Julian date (UTC) of 0h UTC on the given Gregorian calendar day.
///
/// Arguments
/// ---------
/// * `year`, `month`, `day`: calendar date, `month` in `1..=12`.
///
/// Return
/// ------
/// * the Julian date, or [`JovianError::InvalidDate`] if the date does not exist.
pub fn calendar_to_jd(year: i32, month: u8, day: u8) -> Result<JD, JovianError> {
    Epoch::maybe_from_gregorian_utc(year, month, day, 0, 0, 0, 0)
        .map(|epoch| epoch.to_jde_utc_days())
        .map_err(|_| JovianError::InvalidDate { year, month, day })
}

/// Number of days in a Gregorian calendar month.
pub fn days_in_month(year: i32, month: u8) -> Result<f64, JovianError> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first = calendar_to_jd(year, month, 1)?;
    let next = calendar_to_jd(next_year, next_month, 1)?;
    Ok((next - first).round())
}

/// Convert a Julian date from the UTC to the TT time scale.
///
/// Planetary and satellite theories are expressed in dynamical time, while the
/// engine works in UTC; the offset is `32.184 s` plus the accumulated leap seconds.
pub fn utc_to_tt(jd_utc: JD) -> JD {
    Epoch::from_jde_utc(jd_utc).to_jde_tt_days()
}

/// Julian centuries elapsed since J2000.0 for a TT Julian date.
#[inline]
pub fn centuries_since_j2000(jd_tt: JD) -> f64 {
    (jd_tt - J2000) / DAYS_PER_CENTURY
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Julian date (UT1 time scale, UTC accepted).
///
/// The IAU 1982 cubic gives GMST at 0h UT1; the fraction of the day since 0h is
/// then added at the sidereal rate.
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
pub fn gmst(jd_ut: JD) -> f64 {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    // 0h UT1 of the current day, expressed as MJD
    let mjd = jd_ut - JDTOMJD;
    let mjd0 = mjd.floor();
    let t = (mjd0 + JDTOMJD - J2000) / DAYS_PER_CENTURY;

    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / SECONDS_PER_DAY;

    (gmst0 + (mjd - mjd0) * DPI * RAP).rem_euclid(DPI)
}

/// Signed difference `a - b` between two angles, reduced to `(-180°, 180°]`.
pub fn angle_diff_deg(a: Degree, b: Degree) -> Degree {
    let d = (a - b).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}
