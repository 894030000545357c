//! Planner configuration file support.
//!
//! Every tuned constant of the engine lives here with its built-in default:
//! clustering radii and refinement caps, the permutation bound, the epoch
//! cap, the sky-brightness model parameters, and the mount motion defaults.
//! Configuration can be loaded from a TOML file; a missing file or missing
//! keys fall back to the defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PlannerError, Result};

/// Top-level planner configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub clustering: ClusteringConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub sky: SkyModelConfig,
    #[serde(default)]
    pub motion: MotionConfig,
}

/// Adaptive clustering-radius settings (degrees where angular).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Neighbor rank for the k-distance statistic.
    #[serde(default = "default_neighbor_rank")]
    pub neighbor_rank: usize,
    /// Cluster size the radius refinement steers toward.
    #[serde(default = "default_target_cluster_size")]
    pub target_cluster_size: f64,
    #[serde(default = "default_min_radius")]
    pub min_radius_deg: f64,
    #[serde(default = "default_max_radius")]
    pub max_radius_deg: f64,
    /// Radius used when no usable k-distances exist.
    #[serde(default = "default_fallback_radius")]
    pub fallback_radius_deg: f64,
    #[serde(default = "default_max_refine_iterations")]
    pub max_refine_iterations: u32,
    #[serde(default = "default_shrink_factor")]
    pub shrink_factor: f64,
    #[serde(default = "default_expand_factor")]
    pub expand_factor: f64,
    /// Elbow candidates below this fraction of the median are discarded
    /// in favor of the percentile fallback.
    #[serde(default = "default_elbow_median_ratio")]
    pub elbow_median_ratio: f64,
    #[serde(default = "default_percentile_fallback")]
    pub percentile_fallback: f64,
    /// Median multiples bounding the selected radius.
    #[serde(default = "default_lower_clamp_ratio")]
    pub lower_clamp_ratio: f64,
    #[serde(default = "default_upper_clamp_ratio")]
    pub upper_clamp_ratio: f64,
}

/// Route-search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Largest group solved by exhaustive permutation; larger groups fall
    /// back to nearest-neighbor ordering.
    #[serde(default = "default_max_permutation_size")]
    pub max_permutation_size: usize,
}

/// Top-level scheduling loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Hard cap on scheduling epochs; guarantees termination when targets
    /// never become feasible.
    #[serde(default = "default_max_epochs")]
    pub max_epochs: u32,
}

/// Scattered-moonlight sky model parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkyModelConfig {
    /// Observing wavelength, micrometers.
    #[serde(default = "default_wavelength")]
    pub wavelength_um: f64,
    /// Solar photosphere temperature, kelvin.
    #[serde(default = "default_sun_temperature")]
    pub sun_temperature_k: f64,
    #[serde(default = "default_sun_radius")]
    pub sun_radius_km: f64,
    #[serde(default = "default_sun_distance")]
    pub sun_distance_km: f64,
    #[serde(default = "default_moon_radius")]
    pub moon_radius_km: f64,
    #[serde(default = "default_moon_distance")]
    pub moon_distance_km: f64,
    /// Geometric lunar albedo.
    #[serde(default = "default_moon_albedo")]
    pub moon_albedo: f64,
    /// Surface pressure for the Rayleigh optical depth, hPa.
    #[serde(default = "default_site_pressure")]
    pub site_pressure_hpa: f64,
    /// Vertical aerosol optical depth at 550 nm.
    #[serde(default = "default_aerosol_tau")]
    pub aerosol_tau_550: f64,
    /// Angstrom exponent for the aerosol wavelength scaling.
    #[serde(default = "default_angstrom_exponent")]
    pub angstrom_exponent: f64,
    /// Henyey-Greenstein asymmetry parameter for aerosol scattering.
    #[serde(default = "default_hg_asymmetry")]
    pub hg_asymmetry: f64,
    /// Rayleigh depolarization factor.
    #[serde(default = "default_depolarization")]
    pub rayleigh_depolarization: f64,
    /// Minimum sky surface brightness (mag/arcsec^2) for a pointing to
    /// count as moonlight-free.
    #[serde(default = "default_brightness_threshold")]
    pub brightness_threshold: f64,
}

/// Mount motion defaults, applied when the caller supplies no limits or
/// non-positive values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Slew speed ceiling per axis, degrees per second.
    #[serde(default = "default_max_speed")]
    pub max_speed_deg_per_sec: f64,
    /// Axis acceleration, degrees per second squared.
    #[serde(default = "default_acceleration")]
    pub acceleration_deg_per_sec2: f64,
}

fn default_neighbor_rank() -> usize {
    2
}

fn default_target_cluster_size() -> f64 {
    5.0
}

fn default_min_radius() -> f64 {
    0.2
}

fn default_max_radius() -> f64 {
    15.0
}

fn default_fallback_radius() -> f64 {
    1.5
}

fn default_max_refine_iterations() -> u32 {
    8
}

fn default_shrink_factor() -> f64 {
    0.75
}

fn default_expand_factor() -> f64 {
    1.25
}

fn default_elbow_median_ratio() -> f64 {
    0.9
}

fn default_percentile_fallback() -> f64 {
    0.60
}

fn default_lower_clamp_ratio() -> f64 {
    0.8
}

fn default_upper_clamp_ratio() -> f64 {
    2.2
}

fn default_max_permutation_size() -> usize {
    10
}

fn default_max_epochs() -> u32 {
    100
}

fn default_wavelength() -> f64 {
    0.55
}

fn default_sun_temperature() -> f64 {
    5600.0
}

fn default_sun_radius() -> f64 {
    696_000.0
}

fn default_sun_distance() -> f64 {
    1.496e8
}

fn default_moon_radius() -> f64 {
    1737.4
}

fn default_moon_distance() -> f64 {
    384_400.0
}

fn default_moon_albedo() -> f64 {
    0.12
}

fn default_site_pressure() -> f64 {
    1013.25
}

fn default_aerosol_tau() -> f64 {
    0.10
}

fn default_angstrom_exponent() -> f64 {
    1.3
}

fn default_hg_asymmetry() -> f64 {
    0.9
}

fn default_depolarization() -> f64 {
    0.0148
}

fn default_brightness_threshold() -> f64 {
    20.0
}

fn default_max_speed() -> f64 {
    10.0
}

fn default_acceleration() -> f64 {
    1.2
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            neighbor_rank: default_neighbor_rank(),
            target_cluster_size: default_target_cluster_size(),
            min_radius_deg: default_min_radius(),
            max_radius_deg: default_max_radius(),
            fallback_radius_deg: default_fallback_radius(),
            max_refine_iterations: default_max_refine_iterations(),
            shrink_factor: default_shrink_factor(),
            expand_factor: default_expand_factor(),
            elbow_median_ratio: default_elbow_median_ratio(),
            percentile_fallback: default_percentile_fallback(),
            lower_clamp_ratio: default_lower_clamp_ratio(),
            upper_clamp_ratio: default_upper_clamp_ratio(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            max_permutation_size: default_max_permutation_size(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_epochs: default_max_epochs(),
        }
    }
}

impl Default for SkyModelConfig {
    fn default() -> Self {
        Self {
            wavelength_um: default_wavelength(),
            sun_temperature_k: default_sun_temperature(),
            sun_radius_km: default_sun_radius(),
            sun_distance_km: default_sun_distance(),
            moon_radius_km: default_moon_radius(),
            moon_distance_km: default_moon_distance(),
            moon_albedo: default_moon_albedo(),
            site_pressure_hpa: default_site_pressure(),
            aerosol_tau_550: default_aerosol_tau(),
            angstrom_exponent: default_angstrom_exponent(),
            hg_asymmetry: default_hg_asymmetry(),
            rayleigh_depolarization: default_depolarization(),
            brightness_threshold: default_brightness_threshold(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_speed_deg_per_sec: default_max_speed(),
            acceleration_deg_per_sec2: default_acceleration(),
        }
    }
}

impl PlannerConfig {
    /// Load planner configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(PlannerConfig)` if successful
    /// * `Err(PlannerError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            PlannerError::Configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: PlannerConfig = toml::from_str(&content).map_err(|e| {
            PlannerError::Configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load planner configuration from the default location.
    ///
    /// Searches for `planner.toml` in:
    /// 1. Current directory
    /// 2. `config/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self> {
        let search_paths = vec![
            PathBuf::from("planner.toml"),
            PathBuf::from("config/planner.toml"),
            PathBuf::from("../planner.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(PlannerError::Configuration(
            "No planner.toml found in standard locations".to_string(),
        ))
    }
}
