//! Route search over clustered targets.
//!
//! Inside a cluster: the member with the minimum hour angle is pinned as
//! the terminal stop and every permutation of the rest is scored by its
//! summed slew times plus the closing edge into the terminal. The same
//! search runs one level up across cluster centroids to order the
//! clusters. Assembly then walks the cluster order with a moving clock:
//! each cluster's internal route is solved at the time the mount actually
//! arrives there, since hour angles (and with them flip decisions and
//! slew costs) drift as the night progresses.

use qtty::Seconds;

use super::clustering::cluster_targets;
use super::motion::{slew_time, MotionLimits};
use crate::astro::transforms::hour_angle;
use crate::astro::EquatorialCoords;
use crate::config::{PlannerConfig, RoutingConfig};
use crate::models::JulianDate;

/// An ordered visit sequence over a position slice, with the slew time it
/// accumulates. Entries index into the slice the solve ran on.
#[derive(Debug, Clone)]
pub struct SubRoute {
    pub order: Vec<usize>,
    pub travel: Seconds,
}

impl SubRoute {
    fn empty() -> Self {
        Self {
            order: Vec::new(),
            travel: Seconds::new(0.0),
        }
    }

    fn single(index: usize) -> Self {
        Self {
            order: vec![index],
            travel: Seconds::new(0.0),
        }
    }
}

fn advance(jd: JulianDate, seconds: f64) -> JulianDate {
    JulianDate::new(jd.value() + seconds / 86_400.0)
}

/// Position (within `indices`) of the member with the minimum hour angle.
fn min_hour_angle_position(
    positions: &[EquatorialCoords],
    indices: &[usize],
    jd: JulianDate,
    longitude: qtty::Degrees,
) -> usize {
    let mut best = 0;
    let mut best_ha = f64::MAX;
    for (pos, &i) in indices.iter().enumerate() {
        let ha = hour_angle(jd, positions[i].ra, longitude).value();
        if ha < best_ha {
            best_ha = ha;
            best = pos;
        }
    }
    best
}

/// Pairwise slew times between the indexed positions at a fixed instant.
fn slew_matrix(
    positions: &[EquatorialCoords],
    indices: &[usize],
    jd: JulianDate,
    longitude: qtty::Degrees,
    limits: &MotionLimits,
) -> Vec<Vec<f64>> {
    let n = indices.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for a in 0..n {
        for b in 0..n {
            if a != b {
                matrix[a][b] = slew_time(
                    positions[indices[a]],
                    positions[indices[b]],
                    jd,
                    longitude,
                    limits,
                )
                .value();
            }
        }
    }
    matrix
}

/// Heap's algorithm: visit every permutation of `items` in place.
fn for_each_permutation(k: usize, items: &mut [usize], visit: &mut impl FnMut(&[usize])) {
    if k <= 1 {
        visit(items);
        return;
    }
    for i in 0..k {
        for_each_permutation(k - 1, items, visit);
        if k % 2 == 0 {
            items.swap(i, k - 1);
        } else {
            items.swap(0, k - 1);
        }
    }
}

/// Cheapest visiting order for a member set at a fixed instant.
///
/// The minimum-hour-angle member (it sets first) is pinned last; the rest
/// are ordered by exhaustive permutation, or greedily (nearest next,
/// starting farthest from the terminal) once the set exceeds the
/// permutation bound.
///
/// # Arguments
/// * `positions` - coordinate slice the indices point into
/// * `indices` - members to order
/// * `jd` - instant the slew matrix and hour angles are evaluated at
///
/// # Returns
/// The visiting order (global indices, terminal last) and its total slew.
pub fn solve_cluster(
    positions: &[EquatorialCoords],
    indices: &[usize],
    jd: JulianDate,
    longitude: qtty::Degrees,
    limits: &MotionLimits,
    cfg: &RoutingConfig,
) -> SubRoute {
    match indices.len() {
        0 => return SubRoute::empty(),
        1 => return SubRoute::single(indices[0]),
        _ => {}
    }

    let n = indices.len();
    let terminal = min_hour_angle_position(positions, indices, jd, longitude);
    let matrix = slew_matrix(positions, indices, jd, longitude, limits);
    let rest: Vec<usize> = (0..n).filter(|&p| p != terminal).collect();

    let (local_order, travel) = if n > cfg.max_permutation_size {
        greedy_order(&rest, terminal, &matrix)
    } else {
        permuted_order(&rest, terminal, &matrix)
    };

    let mut order: Vec<usize> = local_order.iter().map(|&p| indices[p]).collect();
    order.push(indices[terminal]);
    SubRoute {
        order,
        travel: Seconds::new(travel),
    }
}

/// Exhaustive fixed-terminal search over the non-terminal members.
fn permuted_order(rest: &[usize], terminal: usize, matrix: &[Vec<f64>]) -> (Vec<usize>, f64) {
    let mut best: Vec<usize> = rest.to_vec();
    let mut best_cost = f64::MAX;
    let mut scratch: Vec<usize> = rest.to_vec();
    let k = scratch.len();

    for_each_permutation(k, &mut scratch, &mut |perm| {
        let mut cost = 0.0;
        for w in perm.windows(2) {
            cost += matrix[w[0]][w[1]];
        }
        if let Some(&last) = perm.last() {
            cost += matrix[last][terminal];
        }
        if cost < best_cost {
            best_cost = cost;
            best = perm.to_vec();
        }
    });

    (best, best_cost)
}

/// Nearest-next fallback for groups too large to permute. Starts at the
/// member farthest from the terminal so the route drifts toward it.
fn greedy_order(rest: &[usize], terminal: usize, matrix: &[Vec<f64>]) -> (Vec<usize>, f64) {
    let mut remaining: Vec<usize> = rest.to_vec();
    let start_pos = remaining
        .iter()
        .enumerate()
        .max_by(|(_, &a), (_, &b)| matrix[a][terminal].total_cmp(&matrix[b][terminal]))
        .map(|(pos, _)| pos)
        .unwrap_or(0);

    let mut order = vec![remaining.swap_remove(start_pos)];
    let mut cost = 0.0;

    while !remaining.is_empty() {
        let current = *order.last().unwrap_or(&terminal);
        let next_pos = remaining
            .iter()
            .enumerate()
            .min_by(|(_, &a), (_, &b)| matrix[current][a].total_cmp(&matrix[current][b]))
            .map(|(pos, _)| pos)
            .unwrap_or(0);
        let next = remaining.swap_remove(next_pos);
        cost += matrix[current][next];
        order.push(next);
    }

    if let Some(&last) = order.last() {
        cost += matrix[last][terminal];
    }
    (order, cost)
}

/// Two-level route over a position set.
///
/// The set is clustered adaptively; cluster centroids are ordered by the
/// fixed-terminal search; each cluster is then solved internally at the
/// clock value the assembly has reached, and the clock moves forward over
/// every inter-cluster link and internal route.
///
/// # Returns
/// The full visiting order (indices into `positions`) and the summed slew
/// time. Exposure durations are not included here; the scheduler accounts
/// for them per epoch.
pub fn solve_route(
    positions: &[EquatorialCoords],
    start: JulianDate,
    longitude: qtty::Degrees,
    limits: &MotionLimits,
    cfg: &PlannerConfig,
) -> SubRoute {
    let n = positions.len();
    if n == 0 {
        return SubRoute::empty();
    }
    if n == 1 {
        return SubRoute::single(0);
    }

    let (clusters, _radius) = cluster_targets(positions, &cfg.clustering);

    if clusters.is_empty() {
        let all: Vec<usize> = (0..n).collect();
        return solve_cluster(positions, &all, start, longitude, limits, &cfg.routing);
    }
    if clusters.len() == 1 {
        return solve_cluster(
            positions,
            &clusters[0].members,
            start,
            longitude,
            limits,
            &cfg.routing,
        );
    }

    let centroids: Vec<EquatorialCoords> = clusters.iter().map(|c| c.centroid).collect();
    let centroid_indices: Vec<usize> = (0..centroids.len()).collect();
    let cluster_order = solve_cluster(
        &centroids,
        &centroid_indices,
        start,
        longitude,
        limits,
        &cfg.routing,
    )
    .order;

    let mut order: Vec<usize> = Vec::with_capacity(n);
    let mut travel = 0.0;
    let mut clock = start;

    for &c in &cluster_order {
        let intra = solve_cluster(
            positions,
            &clusters[c].members,
            clock,
            longitude,
            limits,
            &cfg.routing,
        );

        if let (Some(&prev_last), Some(&first)) = (order.last(), intra.order.first()) {
            let link = slew_time(positions[prev_last], positions[first], clock, longitude, limits)
                .value();
            travel += link;
            clock = advance(clock, link);
        }

        travel += intra.travel.value();
        clock = advance(clock, intra.travel.value());
        order.extend(intra.order);
    }

    SubRoute {
        order,
        travel: Seconds::new(travel),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::transforms::greenwich_sidereal_time;
    use crate::config::MotionConfig;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use qtty::{Degrees, HourAngle, HourAngles};

    fn jd() -> JulianDate {
        JulianDate::new(2_460_123.25)
    }

    fn lon_for_lst_90() -> Degrees {
        (Degrees::new(90.0) - greenwich_sidereal_time(jd())).wrap_signed()
    }

    fn eq_deg(ra_deg: f64, dec_deg: f64) -> EquatorialCoords {
        EquatorialCoords::new(Degrees::new(ra_deg).to::<HourAngle>(), Degrees::new(dec_deg))
    }

    fn eq_h(ra_hours: f64, dec_deg: f64) -> EquatorialCoords {
        EquatorialCoords::new(HourAngles::new(ra_hours), Degrees::new(dec_deg))
    }

    fn limits() -> MotionLimits {
        MotionLimits::from_config(&MotionConfig::default())
    }

    fn routing_cfg() -> RoutingConfig {
        RoutingConfig::default()
    }

    #[test]
    fn test_solve_cluster_trivial_sizes() {
        let lon = lon_for_lst_90();
        let empty = solve_cluster(&[], &[], jd(), lon, &limits(), &routing_cfg());
        assert!(empty.order.is_empty());
        assert_relative_eq!(empty.travel.value(), 0.0);

        let positions = [eq_deg(80.0, 10.0)];
        let single = solve_cluster(&positions, &[0], jd(), lon, &limits(), &routing_cfg());
        assert_eq!(single.order, vec![0]);
        assert_relative_eq!(single.travel.value(), 0.0);
    }

    #[test]
    fn test_solve_cluster_pins_min_hour_angle_last() {
        // LST 90: RA 85 has HA 5, RA 80 has HA 10. The smaller hour angle
        // is the terminal stop.
        let lon = lon_for_lst_90();
        let positions = [eq_deg(85.0, 0.0), eq_deg(80.0, 0.0)];
        let route = solve_cluster(&positions, &[0, 1], jd(), lon, &limits(), &routing_cfg());
        assert_eq!(route.order, vec![1, 0]);
        assert_relative_eq!(route.travel.value(), 2.0 * (5.0f64 / 1.2).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_solve_cluster_picks_cheapest_permutation() {
        // Three targets on a line west of the meridian; the ordered sweep
        // beats the crossing order.
        let lon = lon_for_lst_90();
        let positions = [eq_deg(80.0, 0.0), eq_deg(83.0, 0.0), eq_deg(86.0, 0.0)];
        let route = solve_cluster(&positions, &[0, 1, 2], jd(), lon, &limits(), &routing_cfg());
        assert_eq!(route.order, vec![0, 1, 2]);
        let edge = 2.0 * (3.0f64 / 1.2).sqrt();
        assert_relative_eq!(route.travel.value(), 2.0 * edge, epsilon = 1e-9);
    }

    #[test]
    fn test_greedy_fallback_visits_everything_once() {
        let lon = lon_for_lst_90();
        let positions: Vec<EquatorialCoords> =
            (0..6).map(|i| eq_deg(70.0 + 2.0 * i as f64, 5.0 * (i % 3) as f64)).collect();
        let indices: Vec<usize> = (0..6).collect();
        let tight = RoutingConfig {
            max_permutation_size: 3,
        };
        let route = solve_cluster(&positions, &indices, jd(), lon, &limits(), &tight);

        let mut seen = route.order.clone();
        seen.sort_unstable();
        assert_eq!(seen, indices);
        assert!(route.travel.value() > 0.0);
    }

    #[test]
    fn test_greedy_matches_permutation_terminal() {
        // Same instance solved both ways pins the same terminal.
        let lon = lon_for_lst_90();
        let positions: Vec<EquatorialCoords> =
            (0..5).map(|i| eq_deg(70.0 + 3.0 * i as f64, 0.0)).collect();
        let indices: Vec<usize> = (0..5).collect();
        let tight = RoutingConfig {
            max_permutation_size: 4,
        };
        let exhaustive = solve_cluster(&positions, &indices, jd(), lon, &limits(), &routing_cfg());
        let greedy = solve_cluster(&positions, &indices, jd(), lon, &limits(), &tight);
        assert_eq!(exhaustive.order.last(), greedy.order.last());
    }

    #[test]
    fn test_solve_route_empty_and_single() {
        let lon = lon_for_lst_90();
        let cfg = PlannerConfig::default();
        let empty = solve_route(&[], jd(), lon, &limits(), &cfg);
        assert!(empty.order.is_empty());

        let single = solve_route(&[eq_h(5.0, 20.0)], jd(), lon, &limits(), &cfg);
        assert_eq!(single.order, vec![0]);
        assert_relative_eq!(single.travel.value(), 0.0);
    }

    #[test]
    fn test_solve_route_keeps_clusters_contiguous() {
        // Two tight triples far apart: each cluster is visited as a block,
        // and the eastern cluster (negative hour angle) comes last.
        let lon = lon_for_lst_90();
        let cfg = PlannerConfig::default();
        let positions = [
            eq_h(1.0, 10.0),
            eq_h(1.05, 10.4),
            eq_h(1.1, 10.8),
            eq_h(14.0, -20.0),
            eq_h(14.05, -20.4),
            eq_h(14.1, -20.8),
        ];
        let route = solve_route(&positions, jd(), lon, &limits(), &cfg);

        let mut seen = route.order.clone();
        seen.sort_unstable();
        assert_eq!(seen, (0..6).collect::<Vec<_>>());

        let mut first_block = route.order[..3].to_vec();
        first_block.sort_unstable();
        assert_eq!(first_block, vec![0, 1, 2]);
        assert!(route.travel.value() > 0.0);
    }

    #[test]
    fn test_solve_route_deterministic() {
        let lon = lon_for_lst_90();
        let cfg = PlannerConfig::default();
        let positions: Vec<EquatorialCoords> = (0..8)
            .map(|i| eq_h(0.5 * i as f64, -10.0 + 4.0 * i as f64))
            .collect();
        let a = solve_route(&positions, jd(), lon, &limits(), &cfg);
        let b = solve_route(&positions, jd(), lon, &limits(), &cfg);
        assert_eq!(a.order, b.order);
        assert_relative_eq!(a.travel.value(), b.travel.value());
    }

    proptest! {
        #[test]
        fn prop_route_visits_every_input_once(
            seeds in proptest::collection::vec((0.0..24.0f64, -80.0..80.0f64), 0..8)
        ) {
            let lon = lon_for_lst_90();
            let cfg = PlannerConfig::default();
            let positions: Vec<EquatorialCoords> =
                seeds.iter().map(|&(ra, dec)| eq_h(ra, dec)).collect();
            let route = solve_route(&positions, jd(), lon, &limits(), &cfg);

            let mut seen = route.order.clone();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..positions.len()).collect::<Vec<_>>());
            prop_assert!(route.travel.value() >= 0.0);
            prop_assert!(route.travel.value().is_finite());
        }
    }
}
