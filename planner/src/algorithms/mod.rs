//! Route-planning algorithms.
//!
//! This module holds the geometric and combinatorial machinery behind the
//! planner: angular separations and obstacle-mask interpolation, adaptive
//! proximity clustering, mount slew modelling, and the fixed-terminal
//! route search over clusters.
//!
//! # Components
//!
//! - [`geometry`]: Angular distance and horizon-mask interpolation
//! - [`clustering`]: Radius selection and flood-fill grouping
//! - [`motion`]: Per-axis slew kinematics and meridian-flip handling
//! - [`routing`]: Fixed-terminal permutation search and route assembly

pub mod clustering;
pub mod geometry;
pub mod motion;
pub mod routing;

pub use clustering::{cluster_at_radius, cluster_targets, select_radius, Cluster};
pub use geometry::{angular_distance, interpolate_obstacle_altitude};
pub use motion::{slew_time, AxisMotion, MotionLimits};
pub use routing::{solve_cluster, solve_route, SubRoute};
