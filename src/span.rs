use serde::{Deserialize, Serialize};

use crate::{
    constants::{HOURS_PER_DAY, JD},
    jovian_errors::JovianError,
    time::{calendar_to_jd, days_in_month},
};

/// Validated time window `[jd0, jd0 + days]` scanned by the engine, usually one
/// calendar month starting at local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthSpan {
    jd0: JD,
    days: f64,
}

impl MonthSpan {
    /// Build a window from its first Julian date (UTC) and its length in days.
    ///
    /// Errors
    /// ----------
    /// * [`JovianError::InvalidTimeSpan`] if `jd0` is not finite or `days` is not a
    ///   finite positive number.
    pub fn new(jd0: JD, days: f64) -> Result<Self, JovianError> {
        if !jd0.is_finite() {
            return Err(JovianError::InvalidTimeSpan(format!(
                "start JD {jd0} is not finite"
            )));
        }
        if !(days.is_finite() && days > 0.0) {
            return Err(JovianError::InvalidTimeSpan(format!(
                "length of {days} days must be finite and positive"
            )));
        }
        Ok(MonthSpan { jd0, days })
    }

    /// The calendar month `year-month`, starting at local midnight for an observer
    /// whose local time is `utc_offset` hours ahead of UTC.
    pub fn from_calendar(year: i32, month: u8, utc_offset: f64) -> Result<Self, JovianError> {
        let jd0 = calendar_to_jd(year, month, 1)? - utc_offset / HOURS_PER_DAY;
        MonthSpan::new(jd0, days_in_month(year, month)?)
    }

    pub fn begin(&self) -> JD {
        self.jd0
    }

    pub fn end(&self) -> JD {
        self.jd0 + self.days
    }

    pub fn days(&self) -> f64 {
        self.days
    }

    /// Number of whole `step`-day steps covering the window.
    pub fn steps(&self, step: f64) -> usize {
        (self.days / step).round() as usize
    }

    pub fn contains(&self, jd: JD) -> bool {
        jd >= self.begin() && jd <= self.end()
    }
}
