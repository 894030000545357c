//! Integration tests for end-to-end route planning.

mod support;

use chrono::Duration;
use skytour::{plan_route, ObstacleProfile, PlanOutcome};
use support::{default_site, geometry_only_config, local_midnight, target};

/// Test that a lone target near the local meridian is scheduled right at
/// the start, with no slew cost.
#[test]
fn test_single_transit_target_at_local_midnight() {
    let targets = vec![target("transit", 12.0, 45.0, 10.0)];

    let plan = plan_route(
        &targets,
        local_midnight(),
        &default_site(),
        &ObstacleProfile::open(),
        &geometry_only_config(),
    );

    assert_eq!(plan.outcome, PlanOutcome::Complete);
    assert_eq!(plan.epochs, 1);
    assert_eq!(plan.legs.len(), 1);
    assert_eq!(plan.legs[0].target, 0);
    assert_eq!(plan.legs[0].start, local_midnight());
    assert_eq!(plan.total_slew.value(), 0.0);
    assert_eq!(plan.finished_at, local_midnight() + Duration::minutes(10));
}

/// Test that targets packed closer than the adaptive radius land in one
/// cluster and come out in the order with the lower total motion time:
/// the eastward sweep, ending at the member closest to setting first.
#[test]
fn test_close_group_visited_in_cheapest_order() {
    // All three sit west of the meridian at local midnight (LST ~11.9 h),
    // so their hour angles share a sign and no leg crosses the meridian.
    let targets = vec![
        target("west", 11.0, 45.0, 10.0),
        target("mid", 11.3, 45.0, 10.0),
        target("near-meridian", 11.7, 45.0, 10.0),
    ];

    let plan = plan_route(
        &targets,
        local_midnight(),
        &default_site(),
        &ObstacleProfile::open(),
        &geometry_only_config(),
    );

    assert_eq!(plan.outcome, PlanOutcome::Complete);
    assert_eq!(plan.epochs, 1, "a tight group should fit a single epoch");
    let visited: Vec<usize> = plan.legs.iter().map(|l| l.target).collect();
    assert_eq!(
        visited,
        vec![0, 1, 2],
        "expected the sweep ending at the minimum hour angle"
    );
    assert!(plan.total_slew.value() > 0.0);
}

/// Test that two well-separated groups are each visited as a contiguous
/// block, with the group closest to setting saved for last.
#[test]
fn test_two_groups_visited_as_blocks() {
    let targets = vec![
        target("a1", 10.20, 30.0, 5.0),
        target("a2", 10.25, 30.4, 5.0),
        target("a3", 10.30, 30.8, 5.0),
        target("b1", 13.50, 50.0, 5.0),
        target("b2", 13.55, 50.4, 5.0),
        target("b3", 13.60, 50.8, 5.0),
    ];

    let plan = plan_route(
        &targets,
        local_midnight(),
        &default_site(),
        &ObstacleProfile::open(),
        &geometry_only_config(),
    );

    assert_eq!(plan.outcome, PlanOutcome::Complete);
    assert_eq!(plan.legs.len(), 6);

    let visited: Vec<usize> = plan.legs.iter().map(|l| l.target).collect();
    let mut all = visited.clone();
    all.sort_unstable();
    assert_eq!(all, (0..6).collect::<Vec<_>>(), "every target exactly once");

    // The western group (positive hour angles) goes first; the eastern
    // group still has time and is the terminal cluster.
    let mut first_block = visited[..3].to_vec();
    first_block.sort_unstable();
    assert_eq!(first_block, vec![0, 1, 2], "visit order {visited:?}");

    // Exposure starts move strictly forward.
    for pair in plan.legs.windows(2) {
        assert!(pair[0].start < pair[1].start);
    }
}

/// Test that a plan serializes to JSON with its outcome spelled out.
#[test]
fn test_plan_serializes_to_json() {
    let targets = vec![target("transit", 12.0, 45.0, 10.0)];
    let plan = plan_route(
        &targets,
        local_midnight(),
        &default_site(),
        &ObstacleProfile::open(),
        &geometry_only_config(),
    );

    let json = serde_json::to_string(&plan).expect("plan serializes");
    assert!(json.contains("\"complete\""));
    assert!(json.contains("\"legs\""));
}

/// Test that a mixed request schedules what it can and reports the
/// remainder instead of claiming success.
#[test]
fn test_partial_request_reports_cap() {
    let targets = vec![
        target("reachable", 12.0, 45.0, 10.0),
        target("never-up", 12.0, -80.0, 10.0),
    ];
    let mut config = geometry_only_config();
    config.scheduler.max_epochs = 10;

    let plan = plan_route(
        &targets,
        local_midnight(),
        &default_site(),
        &ObstacleProfile::open(),
        &config,
    );

    assert_eq!(plan.outcome, PlanOutcome::CapReached);
    assert_eq!(plan.epochs, 10);
    assert_eq!(plan.legs.len(), 1);
    assert_eq!(plan.legs[0].target, 0);
    assert_eq!(plan.unscheduled(targets.len()), vec![1]);
    assert!(!plan.is_complete());
}
