//! Shared fixtures for planner integration tests.

use chrono::{DateTime, TimeZone, Utc};
use qtty::{Degrees, HourAngles, Minutes};
use skytour::astro::EquatorialCoords;
use skytour::{PlannerConfig, Site, Target};

/// 2026-03-20 15:28 UTC: local midnight of the equinox night at the
/// default site longitude (128 E), when the local sidereal time sits
/// near 12 h.
pub fn local_midnight() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 20, 15, 28, 0).unwrap()
}

/// The default mid-latitude site (36 N, 128 E).
pub fn default_site() -> Site {
    Site::default()
}

/// Planner config with the moonlight gate neutralized, so scenarios
/// control feasibility through geometry alone.
pub fn geometry_only_config() -> PlannerConfig {
    let mut config = PlannerConfig::default();
    config.sky.brightness_threshold = 0.0;
    config
}

pub fn equatorial(ra_hours: f64, dec_deg: f64) -> EquatorialCoords {
    EquatorialCoords::new(HourAngles::new(ra_hours), Degrees::new(dec_deg))
}

pub fn target(name: &str, ra_hours: f64, dec_deg: f64, minutes: f64) -> Target {
    Target::new(name, equatorial(ra_hours, dec_deg), Minutes::new(minutes))
        .expect("valid test target")
}
