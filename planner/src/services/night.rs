//! Night structure: solar altitude, twilight classification, and dark
//! windows.
//!
//! The scheduler itself gates on per-target sky brightness, but callers
//! planning a session still need to know when the night actually starts.
//! This module classifies instants into the standard twilight bands and
//! scans a time span for the fully dark stretches between them.

use qtty::{Degrees, Minutes};
use serde::{Deserialize, Serialize};

use crate::api::Site;
use crate::astro::ephemeris::sun_position;
use crate::astro::transforms::equatorial_to_horizontal;
use crate::models::JulianDate;

/// Solar altitude bands, from daylight down to full darkness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwilightPhase {
    /// Sun above the horizon
    Day,
    /// Sun between 0 and -6 degrees
    Civil,
    /// Sun between -6 and -12 degrees
    Nautical,
    /// Sun between -12 and -18 degrees
    Astronomical,
    /// Sun below -18 degrees
    Night,
}

/// Solar altitude at an instant.
pub fn sun_altitude(jd: JulianDate, site: &Site) -> Degrees {
    equatorial_to_horizontal(jd, sun_position(jd), site.latitude, site.longitude).alt
}

/// Twilight band for a solar altitude.
pub fn classify_altitude(alt: Degrees) -> TwilightPhase {
    let a = alt.value();
    if a > 0.0 {
        TwilightPhase::Day
    } else if a > -6.0 {
        TwilightPhase::Civil
    } else if a > -12.0 {
        TwilightPhase::Nautical
    } else if a > -18.0 {
        TwilightPhase::Astronomical
    } else {
        TwilightPhase::Night
    }
}

/// Twilight band at an instant.
pub fn classify_twilight(jd: JulianDate, site: &Site) -> TwilightPhase {
    classify_altitude(sun_altitude(jd, site))
}

/// Fully dark intervals within a span, sampled on a fixed step.
///
/// Consecutive dark samples merge into one window whose endpoints are the
/// first and last dark samples, so resolution matches the step. The final
/// sample always lands on `end`.
///
/// ## Returns
/// `(from, to)` pairs in time order; empty when the span is inverted, the
/// step is not positive, or the sun never reaches full darkness.
pub fn dark_windows(
    start: JulianDate,
    end: JulianDate,
    step: Minutes,
    site: &Site,
) -> Vec<(JulianDate, JulianDate)> {
    let mut windows = Vec::new();
    if end.value() <= start.value() || step.value() <= 0.0 {
        return windows;
    }

    let step_days = step.to::<qtty::Day>().value();
    let mut open: Option<JulianDate> = None;
    let mut last_dark: Option<JulianDate> = None;

    let mut t = start.value();
    loop {
        let jd = JulianDate::new(t.min(end.value()));
        if classify_twilight(jd, site) == TwilightPhase::Night {
            if open.is_none() {
                open = Some(jd);
            }
            last_dark = Some(jd);
        } else if let (Some(from), Some(to)) = (open.take(), last_dark.take()) {
            windows.push((from, to));
        }
        if t >= end.value() {
            break;
        }
        t += step_days;
    }

    if let (Some(from), Some(to)) = (open, last_dark) {
        windows.push((from, to));
    }
    windows
}
