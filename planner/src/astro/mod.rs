//! Positional astronomy: sidereal time, coordinate transforms, low-precision
//! sun/moon ephemerides, and the scattered-moonlight sky model.
//!
//! Everything here is pure math on Julian dates and qtty angle quantities.
//! Accuracy targets the scheduling use case (arcminutes, not arcseconds).

pub mod ephemeris;
pub mod sky_brightness;
pub mod transforms;

pub use ephemeris::*;
pub use sky_brightness::*;
pub use transforms::*;

use serde::{Deserialize, Serialize};

/// Equatorial position: right ascension in hours, declination in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquatorialCoords {
    pub ra: qtty::HourAngles,
    pub dec: qtty::Degrees,
}

impl EquatorialCoords {
    pub fn new(ra: qtty::HourAngles, dec: qtty::Degrees) -> Self {
        Self { ra, dec }
    }
}

/// Horizontal position: altitude and azimuth (north 0°, east 90°) in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalCoords {
    pub alt: qtty::Degrees,
    pub az: qtty::Degrees,
}

impl HorizontalCoords {
    pub fn new(alt: qtty::Degrees, az: qtty::Degrees) -> Self {
        Self { alt, az }
    }
}
