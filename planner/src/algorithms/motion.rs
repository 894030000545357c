//! Trapezoidal slew-time model for an equatorial mount.
//!
//! Each axis accelerates at a constant rate to its speed ceiling, cruises,
//! and decelerates; short moves never reach cruise and stay triangular.
//! The two axes run concurrently, so a slew takes as long as its slower
//! axis. Crossing the local meridian costs a flip: the declination axis
//! swings through the pole instead of moving directly.

use serde::{Deserialize, Serialize};

use qtty::{Degree, Degrees, Seconds};

use crate::astro::transforms::hour_angle;
use crate::astro::EquatorialCoords;
use crate::config::MotionConfig;
use crate::models::JulianDate;

/// Kinematic limits for one mount axis: speed in degrees per second,
/// acceleration in degrees per second squared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisMotion {
    pub max_speed: f64,
    pub acceleration: f64,
}

impl AxisMotion {
    pub fn new(max_speed: f64, acceleration: f64) -> Self {
        Self {
            max_speed,
            acceleration,
        }
    }

    fn resolved(self, defaults: &MotionConfig) -> AxisMotion {
        AxisMotion {
            max_speed: if self.max_speed > 0.0 {
                self.max_speed
            } else {
                defaults.max_speed_deg_per_sec
            },
            acceleration: if self.acceleration > 0.0 {
                self.acceleration
            } else {
                defaults.acceleration_deg_per_sec2
            },
        }
    }
}

/// Kinematic limits for both mount axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionLimits {
    pub ra: AxisMotion,
    pub dec: AxisMotion,
}

impl MotionLimits {
    pub fn new(ra: AxisMotion, dec: AxisMotion) -> Self {
        Self { ra, dec }
    }

    /// Limits taken straight from the configured defaults.
    pub fn from_config(cfg: &MotionConfig) -> Self {
        let axis = AxisMotion::new(cfg.max_speed_deg_per_sec, cfg.acceleration_deg_per_sec2);
        Self { ra: axis, dec: axis }
    }

    /// Replace unset or non-positive entries with the configured defaults.
    pub fn resolved(self, defaults: &MotionConfig) -> MotionLimits {
        MotionLimits {
            ra: self.ra.resolved(defaults),
            dec: self.dec.resolved(defaults),
        }
    }
}

/// A flip happens only on a strict sign change; an endpoint exactly on
/// the meridian stays on whichever side the other endpoint occupies.
#[inline]
fn is_meridian_flip(ha_from: Degrees, ha_to: Degrees) -> bool {
    ha_from.value() * ha_to.value() < 0.0
}

/// Duration for one axis to cover `displacement` degrees under a
/// trapezoidal velocity profile.
fn axis_travel_time(displacement: f64, axis: AxisMotion) -> f64 {
    let d = displacement.abs();
    let ramp_time = axis.max_speed / axis.acceleration;
    let ramp_distance = axis.acceleration * ramp_time * ramp_time;
    if d < ramp_distance {
        2.0 * (d / axis.acceleration).sqrt()
    } else {
        2.0 * ramp_time + (d - ramp_distance) / axis.max_speed
    }
}

/// Slew duration between two equatorial positions at a given instant.
///
/// A meridian flip is detected when the endpoint hour angles carry
/// strictly opposite signs. Without a flip the RA axis covers the raw
/// difference of the [0°, 360°) positions (the axis does not cross its
/// wrap point) and the Dec axis the direct declination difference. With a
/// flip the RA positions are compared on the [-180°, 180°) side of the
/// range and the Dec axis travels through the pole: 180° - dec1 - dec2.
///
/// `limits` must already be resolved; see [`MotionLimits::resolved`].
pub fn slew_time(
    from: EquatorialCoords,
    to: EquatorialCoords,
    jd: JulianDate,
    longitude: Degrees,
    limits: &MotionLimits,
) -> Seconds {
    let ha_from = hour_angle(jd, from.ra, longitude);
    let ha_to = hour_angle(jd, to.ra, longitude);
    let flip = is_meridian_flip(ha_from, ha_to);

    let ra_from = from.ra.to::<Degree>().wrap_pos();
    let ra_to = to.ra.to::<Degree>().wrap_pos();

    let (ra_disp, dec_disp) = if flip {
        let ra_disp = (ra_from.wrap_signed_lo().value() - ra_to.wrap_signed_lo().value()).abs();
        let dec_disp = 180.0 - from.dec.value() - to.dec.value();
        (ra_disp, dec_disp)
    } else {
        let ra_disp = (ra_from.value() - ra_to.value()).abs();
        let dec_disp = (from.dec.value() - to.dec.value()).abs();
        (ra_disp, dec_disp)
    };

    let t_ra = axis_travel_time(ra_disp, limits.ra);
    let t_dec = axis_travel_time(dec_disp, limits.dec);
    Seconds::new(t_ra.max(t_dec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::transforms::greenwich_sidereal_time;
    use approx::assert_relative_eq;
    use qtty::HourAngle;

    fn jd() -> JulianDate {
        JulianDate::new(2_460_123.25)
    }

    /// Longitude that places the local sidereal time at (close to) 90
    /// degrees for `jd()`.
    fn lon_for_lst_90() -> Degrees {
        (Degrees::new(90.0) - greenwich_sidereal_time(jd())).wrap_signed()
    }

    fn eq(ra_deg: f64, dec_deg: f64) -> EquatorialCoords {
        EquatorialCoords::new(Degrees::new(ra_deg).to::<HourAngle>(), Degrees::new(dec_deg))
    }

    fn limits() -> MotionLimits {
        MotionLimits::from_config(&MotionConfig::default())
    }

    #[test]
    fn test_zero_slew_for_same_target() {
        let lon = lon_for_lst_90();
        let t = slew_time(eq(82.5, 40.0), eq(82.5, 40.0), jd(), lon, &limits());
        assert_relative_eq!(t.value(), 0.0);
    }

    #[test]
    fn test_triangular_profile_short_move() {
        // 0.6 degrees of Dec at a = 1.2: never reaches cruise,
        // t = 2*sqrt(d/a).
        let lon = lon_for_lst_90();
        let t = slew_time(eq(82.5, 40.0), eq(82.5, 40.6), jd(), lon, &limits());
        assert_relative_eq!(t.value(), 2.0 * (0.6f64 / 1.2).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_trapezoidal_profile_long_move() {
        // 100 degrees of Dec: ramps cover v^2/a = 83.33 degrees, the rest
        // cruises at 10 deg/s.
        let lon = lon_for_lst_90();
        let t = slew_time(eq(82.5, -50.0), eq(82.5, 50.0), jd(), lon, &limits());
        let ramp = 100.0 / 1.2;
        let expected = 2.0 * (10.0 / 1.2) + (100.0 - ramp) / 10.0;
        assert_relative_eq!(t.value(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_axes_move_concurrently() {
        // RA needs 10 s, Dec 1.41 s: the slew takes the slower axis.
        let lon = lon_for_lst_90();
        let t = slew_time(eq(50.0, 40.0), eq(80.0, 40.6), jd(), lon, &limits());
        assert_relative_eq!(t.value(), 2.0 * (30.0f64 / 1.2).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_meridian_flip_swings_through_pole() {
        // LST 90: RA 80 sits west of the meridian, RA 100 east. Dec path
        // becomes 180 - 30 - 40 = 110 degrees.
        let lon = lon_for_lst_90();
        let t = slew_time(eq(80.0, 30.0), eq(100.0, 40.0), jd(), lon, &limits());
        let ramp = 100.0 / 1.2;
        let expected = 2.0 * (10.0 / 1.2) + (110.0 - ramp) / 10.0;
        assert_relative_eq!(t.value(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_flip_requires_strict_sign_change() {
        assert!(is_meridian_flip(Degrees::new(7.5), Degrees::new(-7.5)));
        assert!(!is_meridian_flip(Degrees::new(7.5), Degrees::new(7.5)));
        // An endpoint exactly on the meridian never triggers a flip.
        assert!(!is_meridian_flip(Degrees::new(0.0), Degrees::new(-10.0)));
        assert!(!is_meridian_flip(Degrees::new(10.0), Degrees::new(0.0)));
    }

    #[test]
    fn test_near_meridian_same_side_is_direct() {
        // Both endpoints barely west of the meridian: direct Dec path,
        // not the pole swing.
        let lon = lon_for_lst_90();
        let t = slew_time(eq(89.0, 30.0), eq(80.0, 40.0), jd(), lon, &limits());
        let t_ra = 2.0 * (9.0f64 / 1.2).sqrt();
        let t_dec = 2.0 * (10.0f64 / 1.2).sqrt();
        assert_relative_eq!(t.value(), t_ra.max(t_dec), epsilon = 1e-9);
    }

    #[test]
    fn test_ra_axis_does_not_cross_wrap_without_flip() {
        // RA 350 -> 10, both west of the LST-90 meridian: the axis unwinds
        // 340 degrees rather than crossing its wrap point.
        let lon = lon_for_lst_90();
        let t = slew_time(eq(350.0, 0.0), eq(10.0, 0.0), jd(), lon, &limits());
        let ramp = 100.0 / 1.2;
        let expected = 2.0 * (10.0 / 1.2) + (340.0 - ramp) / 10.0;
        assert_relative_eq!(t.value(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_non_positive_limits_resolve_to_defaults() {
        let cfg = MotionConfig::default();
        let broken = MotionLimits::new(AxisMotion::new(0.0, -3.0), AxisMotion::new(5.0, 1.2));
        let resolved = broken.resolved(&cfg);
        assert_relative_eq!(resolved.ra.max_speed, 10.0);
        assert_relative_eq!(resolved.ra.acceleration, 1.2);
        assert_relative_eq!(resolved.dec.max_speed, 5.0);
    }
}
