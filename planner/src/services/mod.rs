//! Observation feasibility services.
//!
//! This layer sits between the raw astronomy math and the scheduler. It
//! answers the questions the scheduling loop actually asks: can this
//! target be observed right now, does it stay observable for its whole
//! exposure, and when is the sky dark at all.
//!
//! # Components
//!
//! - [`visibility`]: Horizon, obstacle, and moonlight gates plus window
//!   feasibility
//! - [`night`]: Twilight classification and dark-window scanning

pub mod night;
pub mod visibility;

pub use night::{classify_twilight, dark_windows, sun_altitude, TwilightPhase};
pub use visibility::{
    feasible_indices, moonlight_observable, observable, obstacle_observable, rise_observable,
    sky_brightness_at, sky_track, window_observable,
};
