//! The epoch-driven scheduling loop.
//!
//! Planning runs in epochs. Each epoch filters the request list down to
//! the targets whose full exposure window fits the sky right now, solves
//! a route over that subset, and commits it: the clock advances first by
//! the route's total slew time, then by each exposure in visiting order.
//! Targets that were infeasible get another chance next epoch at the
//! advanced clock value.
//!
//! ## Termination
//! The loop ends when every target is scheduled, or when the epoch cap is
//! hit. An epoch whose feasible subset is empty burns an epoch without
//! moving the clock, so a request that never becomes feasible cannot spin
//! forever; hitting the cap is reported as [`PlanOutcome::CapReached`],
//! never as quiet success.

use chrono::{DateTime, Duration, Utc};
use qtty::Seconds;

use crate::algorithms::motion::MotionLimits;
use crate::algorithms::routing::solve_route;
use crate::api::{ObstacleProfile, PlanOutcome, RouteLeg, RoutePlan, Site, Target};
use crate::astro::EquatorialCoords;
use crate::config::PlannerConfig;
use crate::models::JulianDate;
use crate::services::visibility::feasible_indices;

fn advance(clock: DateTime<Utc>, seconds: f64) -> DateTime<Utc> {
    clock + Duration::milliseconds((seconds * 1000.0).round() as i64)
}

/// Plans an observation route over the requested targets.
///
/// Mount kinematics come from `config.motion`; use
/// [`plan_route_with_limits`] to supply per-axis values for a specific
/// mount.
///
/// ## Arguments
/// * `targets` - observation requests; leg indices refer into this slice
/// * `start` - clock value planning begins at
/// * `site` - observing site
/// * `mask` - horizon obstacle mask
/// * `config` - clustering, routing, sky-model, and mount parameters
///
/// ## Returns
/// The scheduled legs in visiting order, with per-leg start times, the
/// summed slew time, and whether the request completed or hit the epoch
/// cap with targets left over.
pub fn plan_route(
    targets: &[Target],
    start: DateTime<Utc>,
    site: &Site,
    mask: &ObstacleProfile,
    config: &PlannerConfig,
) -> RoutePlan {
    plan_route_with_limits(
        targets,
        start,
        site,
        mask,
        MotionLimits::from_config(&config.motion),
        config,
    )
}

/// Plans a route with caller-supplied per-axis mount limits.
///
/// Non-positive speed or acceleration entries fall back to the
/// `config.motion` defaults, so a partially-specified mount is fine.
pub fn plan_route_with_limits(
    targets: &[Target],
    start: DateTime<Utc>,
    site: &Site,
    mask: &ObstacleProfile,
    limits: MotionLimits,
    config: &PlannerConfig,
) -> RoutePlan {
    let limits = limits.resolved(&config.motion);
    let mut done = vec![false; targets.len()];
    let mut legs: Vec<RouteLeg> = Vec::new();
    let mut clock = start;
    let mut total_slew = 0.0;
    let mut epochs: u32 = 0;

    let outcome = loop {
        if done.iter().all(|&d| d) {
            break PlanOutcome::Complete;
        }
        if epochs >= config.scheduler.max_epochs {
            let pending = done.iter().filter(|&&d| !d).count();
            log::warn!(
                "epoch cap {} reached with {} target(s) unscheduled",
                config.scheduler.max_epochs,
                pending
            );
            break PlanOutcome::CapReached;
        }
        epochs += 1;

        let jd = JulianDate::from_datetime(&clock);
        let feasible = feasible_indices(jd, targets, &done, site, mask, &config.sky);
        log::debug!(
            "epoch {}: {} of {} pending targets feasible",
            epochs,
            feasible.len(),
            done.iter().filter(|&&d| !d).count()
        );
        if feasible.is_empty() {
            continue;
        }

        let positions: Vec<EquatorialCoords> =
            feasible.iter().map(|&i| targets[i].coords).collect();
        let sub = solve_route(&positions, jd, site.longitude, &limits, config);

        total_slew += sub.travel.value();
        clock = advance(clock, sub.travel.value());

        for &local in &sub.order {
            let global = feasible[local];
            legs.push(RouteLeg {
                target: global,
                epoch: epochs,
                start: clock,
                duration: targets[global].duration,
            });
            done[global] = true;
            clock = advance(clock, targets[global].duration.value() * 60.0);
        }
    };

    RoutePlan {
        legs,
        outcome,
        epochs,
        total_slew: Seconds::new(total_slew),
        finished_at: clock,
    }
}
