//! Target visibility predicates and feasibility filtering.
//!
//! Three independent gates decide whether a target can be observed at an
//! instant:
//! - it must sit above the mathematical horizon,
//! - it must clear the site's obstacle mask at its current azimuth,
//! - the scattered-moonlight surface brightness toward it must stay
//!   fainter than the configured threshold.
//!
//! A target is feasible for scheduling only when every gate passes at both
//! the start and the end of its exposure window; a target that sets, drops
//! behind an obstacle, or drowns in moonlight mid-exposure is rejected
//! whole, never truncated.

use qtty::Minutes;

use crate::algorithms::geometry::angular_distance;
use crate::api::{ObstacleProfile, Site, Target};
use crate::astro::ephemeris::{moon_position, sun_position};
use crate::astro::sky_brightness::{lunar_flux, scattered_intensity, surface_brightness};
use crate::astro::transforms::{equatorial_to_horizontal, zenith_distance};
use crate::astro::{EquatorialCoords, HorizontalCoords};
use crate::config::SkyModelConfig;
use crate::models::JulianDate;

/// True when the target sits above the mathematical horizon.
pub fn rise_observable(jd: JulianDate, target: EquatorialCoords, site: &Site) -> bool {
    equatorial_to_horizontal(jd, target, site.latitude, site.longitude)
        .alt
        .value()
        > 0.0
}

/// True when the target clears the obstacle mask at its current azimuth.
///
/// A target at or below the horizon never clears the mask; above it, an
/// open mask never obstructs, so an empty profile reduces this predicate
/// to [`rise_observable`].
pub fn obstacle_observable(
    jd: JulianDate,
    target: EquatorialCoords,
    site: &Site,
    mask: &ObstacleProfile,
) -> bool {
    let pointing = equatorial_to_horizontal(jd, target, site.latitude, site.longitude);
    if pointing.alt.value() <= 0.0 {
        return false;
    }
    if mask.is_open() {
        return true;
    }
    pointing.alt.value() > mask.altitude_at(pointing.az).value()
}

/// Scattered-moonlight surface brightness toward the target, mag/arcsec^2.
///
/// Evaluates the full chain at one instant: lunar phase from the moon-sun
/// separation, top-of-atmosphere flux, and the single-scattering integral
/// along the line of sight. Larger values are darker; a set moon or target
/// yields the dark-sky floor.
pub fn sky_brightness_at(
    jd: JulianDate,
    target: EquatorialCoords,
    site: &Site,
    cfg: &SkyModelConfig,
) -> f64 {
    let moon = moon_position(jd);
    let sun = sun_position(jd);
    let phase = angular_distance(moon, sun);
    let flux = lunar_flux(phase, cfg);

    let separation = angular_distance(target, moon);
    let target_z = zenith_distance(jd, target, site.latitude, site.longitude);
    let moon_z = zenith_distance(jd, moon, site.latitude, site.longitude);

    surface_brightness(scattered_intensity(flux, separation, target_z, moon_z, cfg))
}

/// True when the sky toward the target is fainter than the configured
/// brightness threshold.
pub fn moonlight_observable(
    jd: JulianDate,
    target: EquatorialCoords,
    site: &Site,
    cfg: &SkyModelConfig,
) -> bool {
    sky_brightness_at(jd, target, site, cfg) > cfg.brightness_threshold
}

/// All three gates at one instant.
pub fn observable(
    jd: JulianDate,
    target: EquatorialCoords,
    site: &Site,
    mask: &ObstacleProfile,
    sky: &SkyModelConfig,
) -> bool {
    rise_observable(jd, target, site)
        && obstacle_observable(jd, target, site, mask)
        && moonlight_observable(jd, target, site, sky)
}

/// Exposure-window feasibility: every gate passes at both the start and
/// the end of the window.
pub fn window_observable(
    start: JulianDate,
    duration: Minutes,
    target: EquatorialCoords,
    site: &Site,
    mask: &ObstacleProfile,
    sky: &SkyModelConfig,
) -> bool {
    let end = JulianDate::new(start.value() + duration.to::<qtty::Day>().value());
    observable(start, target, site, mask, sky) && observable(end, target, site, mask, sky)
}

/// Indices of targets that are still pending and fit their full exposure
/// window at the given clock value.
///
/// ## Arguments
/// * `jd` - clock value the windows are anchored at
/// * `targets` - the full request slice
/// * `done` - per-target completion flags, parallel to `targets`
///
/// ## Returns
/// Indices into `targets`, in request order. Targets whose completion flag
/// is missing are treated as done.
pub fn feasible_indices(
    jd: JulianDate,
    targets: &[Target],
    done: &[bool],
    site: &Site,
    mask: &ObstacleProfile,
    sky: &SkyModelConfig,
) -> Vec<usize> {
    targets
        .iter()
        .enumerate()
        .filter(|(i, t)| {
            !done.get(*i).copied().unwrap_or(true)
                && window_observable(jd, t.duration, t.coords, site, mask, sky)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Sampled horizontal-frame track of a target across a time span.
///
/// ## Returns
/// `(time, pointing)` pairs every `step` minutes from `start` through
/// `end`; the final sample always lands on `end`. Empty when the span is
/// inverted or the step is not positive.
pub fn sky_track(
    start: JulianDate,
    end: JulianDate,
    step: Minutes,
    target: EquatorialCoords,
    site: &Site,
) -> Vec<(JulianDate, HorizontalCoords)> {
    let mut track = Vec::new();
    if end.value() < start.value() || step.value() <= 0.0 {
        return track;
    }

    let step_days = step.to::<qtty::Day>().value();
    let mut t = start.value();
    while t < end.value() {
        let jd = JulianDate::new(t);
        track.push((
            jd,
            equatorial_to_horizontal(jd, target, site.latitude, site.longitude),
        ));
        t += step_days;
    }
    track.push((
        end,
        equatorial_to_horizontal(end, target, site.latitude, site.longitude),
    ));
    track
}
