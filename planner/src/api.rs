//! Public planner surface: observation requests, the observing site, horizon
//! masks, and the plan the scheduler returns.
//!
//! Inputs are validated at construction so the planning pipeline can assume
//! finite, in-range values throughout. Deserializing these types directly
//! skips validation; use [`targets_from_json`] for untrusted input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::algorithms::geometry::interpolate_obstacle_altitude;
use crate::astro::{EquatorialCoords, HorizontalCoords};
use crate::error::{PlannerError, Result};

/// A single observation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// Display name carried through to the plan
    pub name: String,
    /// Catalog position
    pub coords: EquatorialCoords,
    /// Exposure duration in minutes
    pub duration: qtty::Minutes,
}

impl Target {
    /// Builds a validated observation request.
    ///
    /// Right ascension must lie in [0, 24) hours, declination in
    /// [-90, 90] degrees, and the duration must be finite and
    /// positive.
    pub fn new(
        name: impl Into<String>,
        coords: EquatorialCoords,
        duration: qtty::Minutes,
    ) -> Result<Self> {
        let name = name.into();
        let ra = coords.ra.value();
        if !ra.is_finite() || !(0.0..24.0).contains(&ra) {
            return Err(PlannerError::InvalidTarget(format!(
                "{name}: RA {ra} h outside [0, 24)"
            )));
        }
        let dec = coords.dec.value();
        if !dec.is_finite() || !(-90.0..=90.0).contains(&dec) {
            return Err(PlannerError::InvalidTarget(format!(
                "{name}: Dec {dec} deg outside [-90, 90]"
            )));
        }
        let minutes = duration.value();
        if !minutes.is_finite() || minutes <= 0.0 {
            return Err(PlannerError::InvalidTarget(format!(
                "{name}: duration {minutes} min must be finite and positive"
            )));
        }
        Ok(Self {
            name,
            coords,
            duration,
        })
    }
}

/// Parses a JSON array of targets, validating every entry.
pub fn targets_from_json(json: &str) -> Result<Vec<Target>> {
    let raw: Vec<Target> = serde_json::from_str(json)?;
    raw.into_iter()
        .map(|t| Target::new(t.name, t.coords, t.duration))
        .collect()
}

/// Observing site geographic position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Site {
    /// Geodetic latitude, north positive
    pub latitude: qtty::Degrees,
    /// Longitude, east positive
    pub longitude: qtty::Degrees,
}

impl Default for Site {
    /// Mid-latitude site at 36 N, 128 E.
    fn default() -> Self {
        Self {
            latitude: qtty::Degrees::new(36.0),
            longitude: qtty::Degrees::new(128.0),
        }
    }
}

impl Site {
    /// Builds a validated site.
    ///
    /// Latitude must lie in [-90, 90] degrees and longitude in
    /// [-180, 180] degrees, east positive.
    pub fn new(latitude: qtty::Degrees, longitude: qtty::Degrees) -> Result<Self> {
        let lat = latitude.value();
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(PlannerError::InvalidSite(format!(
                "latitude {lat} deg outside [-90, 90]"
            )));
        }
        let lon = longitude.value();
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(PlannerError::InvalidSite(format!(
                "longitude {lon} deg outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// A horizon mask: obstacle edge altitude sampled at azimuths around the
/// site. Fewer than two samples obstructs nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleProfile {
    samples: Vec<HorizontalCoords>,
}

impl ObstacleProfile {
    /// A mask with no obstructions.
    pub fn open() -> Self {
        Self::default()
    }

    /// Builds a mask from altitude/azimuth samples.
    ///
    /// Entries must be finite with altitudes in [-90, 90] degrees;
    /// azimuths are wrapped into [0, 360).
    pub fn from_samples(samples: Vec<HorizontalCoords>) -> Result<Self> {
        for sample in &samples {
            let alt = sample.alt.value();
            let az = sample.az.value();
            if !alt.is_finite() || !az.is_finite() {
                return Err(PlannerError::InvalidProfile(format!(
                    "sample (alt {alt}, az {az}) is not finite"
                )));
            }
            if !(-90.0..=90.0).contains(&alt) {
                return Err(PlannerError::InvalidProfile(format!(
                    "altitude {alt} deg outside [-90, 90]"
                )));
            }
        }
        let samples = samples
            .into_iter()
            .map(|s| HorizontalCoords::new(s.alt, s.az.wrap_pos()))
            .collect();
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[HorizontalCoords] {
        &self.samples
    }

    /// True when the mask cannot obstruct anything.
    pub fn is_open(&self) -> bool {
        self.samples.len() < 2
    }

    /// Obstacle edge altitude at an azimuth, interpolated around the mask.
    pub fn altitude_at(&self, azimuth: qtty::Degrees) -> qtty::Degrees {
        interpolate_obstacle_altitude(azimuth, &self.samples)
    }
}

/// Why the scheduling loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanOutcome {
    /// Every requested target was scheduled.
    Complete,
    /// The epoch cap was reached with targets still unscheduled. The
    /// remainder never became feasible at any clock value the loop saw.
    CapReached,
}

/// One scheduled exposure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteLeg {
    /// Index into the requested target slice
    pub target: usize,
    /// Scheduling epoch the exposure was routed in
    pub epoch: u32,
    /// Exposure start time
    pub start: DateTime<Utc>,
    /// Exposure duration in minutes
    pub duration: qtty::Minutes,
}

/// The scheduler's answer: exposures in visiting order plus bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePlan {
    /// Scheduled exposures in visiting order
    pub legs: Vec<RouteLeg>,
    /// Completion status
    pub outcome: PlanOutcome,
    /// Epochs consumed by the scheduling loop
    pub epochs: u32,
    /// Summed slew time across all epochs
    pub total_slew: qtty::Seconds,
    /// Clock value when the loop stopped
    pub finished_at: DateTime<Utc>,
}

impl RoutePlan {
    pub fn is_complete(&self) -> bool {
        self.outcome == PlanOutcome::Complete
    }

    /// Indices of requested targets the plan never scheduled, given the
    /// size of the original request slice.
    pub fn unscheduled(&self, total: usize) -> Vec<usize> {
        let mut scheduled = vec![false; total];
        for leg in &self.legs {
            if leg.target < total {
                scheduled[leg.target] = true;
            }
        }
        scheduled
            .iter()
            .enumerate()
            .filter_map(|(i, &done)| if done { None } else { Some(i) })
            .collect()
    }
}
