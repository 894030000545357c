//! # skytour
//!
//! Observation route planning for a single night at a ground-based site.
//!
//! Given a list of targets with exposure durations, the planner groups
//! them by angular proximity, orders each group (and the groups
//! themselves) with a fixed-terminal permutation search over mount slew
//! times, and walks a simulated clock forward so every routing decision
//! is made against the sky as it will actually stand. A target is
//! scheduled only when it clears three gates at both ends of its
//! exposure window: above the horizon, clear of the local obstacle mask,
//! and with scattered moonlight fainter than the configured threshold.
//!
//! ## Features
//!
//! - Adaptive proximity clustering with automatic radius selection
//! - Exhaustive fixed-terminal route search, greedy above a size bound
//! - Two-axis slew model with meridian-flip handling
//! - Low-precision sun/moon ephemerides and a scattered-moonlight model
//! - Epoch-driven scheduling loop with a hard termination cap
//!
//! ## Example
//!
//! ```rust,ignore
//! use skytour::{plan_route, ObstacleProfile, PlannerConfig, Site, Target};
//! use skytour::astro::EquatorialCoords;
//! use chrono::Utc;
//! use qtty::{Degrees, HourAngles, Minutes};
//!
//! let m13 = EquatorialCoords::new(HourAngles::new(16.7), Degrees::new(36.5));
//! let targets = vec![Target::new("M13", m13, Minutes::new(12.0))?];
//!
//! let plan = plan_route(
//!     &targets,
//!     Utc::now(),
//!     &Site::default(),
//!     &ObstacleProfile::open(),
//!     &PlannerConfig::default(),
//! );
//! println!("scheduled {} of {}", plan.legs.len(), targets.len());
//! ```

pub mod algorithms;
pub mod api;
pub mod astro;
pub mod config;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod services;

pub use algorithms::motion::{AxisMotion, MotionLimits};
pub use api::{targets_from_json, ObstacleProfile, PlanOutcome, RouteLeg, RoutePlan, Site, Target};
pub use config::PlannerConfig;
pub use error::{PlannerError, Result};
pub use models::JulianDate;
pub use scheduler::{plan_route, plan_route_with_limits};
