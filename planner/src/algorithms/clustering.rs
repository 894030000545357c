//! Density-based target grouping with an adaptive angular radius.
//!
//! The radius comes from the k-distance distribution of the target set: an
//! elbow estimate (maximum deviation above the chord through the sorted
//! distances) guarded by a median ratio, a percentile fallback, and hard
//! bounds. Groups grow by region growing: any chain of pairwise distances
//! within the radius joins a cluster. A short refinement loop nudges the
//! radius when the grouping comes out over-merged or fragmented.

use std::collections::VecDeque;

use qtty::{Degrees, HourAngles};

use super::geometry::angular_distance;
use crate::astro::EquatorialCoords;
use crate::config::ClusteringConfig;

/// A group of targets, identified by indices into the position slice the
/// clustering ran on, plus the mean-coordinate centroid.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub members: Vec<usize>,
    pub centroid: EquatorialCoords,
}

impl Cluster {
    fn from_members(members: Vec<usize>, positions: &[EquatorialCoords]) -> Self {
        let n = members.len().max(1) as f64;
        let ra = members.iter().map(|&i| positions[i].ra.value()).sum::<f64>() / n;
        let dec = members.iter().map(|&i| positions[i].dec.value()).sum::<f64>() / n;
        Self {
            members,
            centroid: EquatorialCoords::new(HourAngles::new(ra), Degrees::new(dec)),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Distance from each position to its k-th nearest neighbor, in degrees.
///
/// Positions with fewer than k neighbors use the farthest available one;
/// a lone position contributes 0.
pub fn k_distances(positions: &[EquatorialCoords], k: usize) -> Vec<f64> {
    let n = positions.len();
    let mut result = Vec::with_capacity(n);

    for i in 0..n {
        let mut dists: Vec<f64> = (0..n)
            .filter(|&j| j != i)
            .map(|j| angular_distance(positions[i], positions[j]).value())
            .collect();
        dists.sort_by(|a, b| a.total_cmp(b));

        let kd = if dists.is_empty() {
            0.0
        } else if k == 0 || k > dists.len() {
            dists[dists.len() - 1]
        } else {
            dists[k - 1]
        };
        result.push(kd);
    }

    result
}

/// Pick the clustering radius from a k-distance sample.
pub fn select_radius(k_distances: &[f64], cfg: &ClusteringConfig) -> f64 {
    let mut clean: Vec<f64> = k_distances.iter().copied().filter(|&d| d > 0.0).collect();
    if clean.is_empty() {
        return cfg.fallback_radius_deg;
    }
    clean.sort_by(|a, b| a.total_cmp(b));

    let n = clean.len();
    let median = clean[n / 2];
    let percentile = clean[(n as f64 * cfg.percentile_fallback) as usize];

    // Elbow: sorted value with maximum deviation above the first-to-last
    // chord. Fewer than two values leave no chord.
    let mut elbow = median;
    if n >= 2 {
        let first = clean[0];
        let last = clean[n - 1];
        let mut max_dev = f64::MIN;
        for (i, &value) in clean.iter().enumerate() {
            let t = i as f64 / (n - 1) as f64;
            let chord = first + (last - first) * t;
            let dev = value - chord;
            if dev > max_dev {
                max_dev = dev;
                elbow = value;
            }
        }
    }

    let mut radius = elbow;
    if radius < cfg.elbow_median_ratio * median {
        radius = percentile;
    }

    let lower = cfg.min_radius_deg.max(cfg.lower_clamp_ratio * median);
    let upper = cfg.max_radius_deg.min(cfg.upper_clamp_ratio * median);
    radius.min(upper).max(lower)
}

/// Region-growing grouping at a fixed radius: a breadth-first flood fill
/// over the pairwise-distance graph.
pub fn cluster_at_radius(positions: &[EquatorialCoords], radius_deg: f64) -> Vec<Cluster> {
    let n = positions.len();
    let mut assigned = vec![false; n];
    let mut clusters = Vec::new();

    for seed in 0..n {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut members = vec![seed];
        let mut queue = VecDeque::from([seed]);

        while let Some(i) = queue.pop_front() {
            for j in 0..n {
                if !assigned[j]
                    && angular_distance(positions[i], positions[j]).value() <= radius_deg
                {
                    assigned[j] = true;
                    members.push(j);
                    queue.push_back(j);
                }
            }
        }

        clusters.push(Cluster::from_members(members, positions));
    }

    clusters
}

/// Full adaptive pipeline: k-distances, radius selection, region growing,
/// and the bounded refinement loop. Returns the clusters and the radius
/// they were grown at.
pub fn cluster_targets(
    positions: &[EquatorialCoords],
    cfg: &ClusteringConfig,
) -> (Vec<Cluster>, f64) {
    let n = positions.len();
    if n == 0 {
        return (Vec::new(), cfg.fallback_radius_deg);
    }
    if n == 1 {
        return (
            vec![Cluster::from_members(vec![0], positions)],
            cfg.fallback_radius_deg,
        );
    }

    let kd = k_distances(positions, cfg.neighbor_rank);
    let mut radius = select_radius(&kd, cfg);
    let mut clusters = cluster_at_radius(positions, radius);

    for iteration in 0..cfg.max_refine_iterations {
        let count = clusters.len();
        if count == 0 {
            break;
        }
        let avg_size = n as f64 / count as f64;

        let over_merged =
            (count == 1 && n > 4) || avg_size > 2.0 * cfg.target_cluster_size;
        let fragmented = avg_size < 2.0 && count > n / 2;
        if !over_merged && !fragmented {
            break;
        }

        let factor = if over_merged {
            cfg.shrink_factor
        } else {
            cfg.expand_factor
        };
        let next = (radius * factor).clamp(cfg.min_radius_deg, cfg.max_radius_deg);
        if (next - radius).abs() < f64::EPSILON {
            // Pinned at a hard bound: no further progress possible.
            break;
        }

        log::debug!(
            "cluster refinement {}: {} clusters (avg {:.1}), radius {:.3} -> {:.3}",
            iteration,
            count,
            avg_size,
            radius,
            next
        );
        radius = next;
        clusters = cluster_at_radius(positions, radius);
    }

    (clusters, radius)
}
