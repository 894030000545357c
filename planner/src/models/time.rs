use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Days from the Julian epoch to the Unix epoch (1970-01-01T00:00:00Z).
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Seconds per day.
const SECONDS_PER_DAY: f64 = 86_400.0;

/// A Julian date on the UTC timescale.
///
/// All ephemeris and sidereal-time math in this crate runs on Julian dates;
/// the scheduler's clock is a [`chrono::DateTime<Utc>`] converted at the
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct JulianDate(qtty::Days);

impl JulianDate {
    /// The J2000.0 reference epoch (2000-01-01T12:00:00 TT, JD 2451545.0).
    pub const J2000: JulianDate = JulianDate(qtty::Days::new(2_451_545.0));

    /// Create a new Julian date.
    pub fn new<V: Into<qtty::Days>>(v: V) -> Self {
        Self(v.into())
    }

    /// Raw Julian date as f64.
    pub fn value(&self) -> f64 {
        self.0.value()
    }

    /// Convert a UTC timestamp to a Julian date.
    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        let unix_days = dt.timestamp_millis() as f64 / (SECONDS_PER_DAY * 1000.0);
        Self::new(unix_days + UNIX_EPOCH_JD)
    }

    /// Convert back to a UTC timestamp (millisecond precision).
    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        let millis = (self.value() - UNIX_EPOCH_JD) * SECONDS_PER_DAY * 1000.0;
        DateTime::<Utc>::from_timestamp_millis(millis.round() as i64)
            .ok_or_else(|| PlannerError::InvalidTime(format!("JD {} out of range", self.value())))
    }

    /// Julian centuries elapsed since J2000.0, the time argument of the
    /// solar, lunar, and sidereal series.
    pub fn centuries_since_j2000(&self) -> qtty::JulianCenturies {
        (self.0 - Self::J2000.0).to::<qtty::JulianCentury>()
    }
}

impl From<f64> for JulianDate {
    fn from(v: f64) -> Self {
        JulianDate::new(v)
    }
}
