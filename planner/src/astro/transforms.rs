//! Sidereal time and equatorial/horizontal coordinate transforms.
//!
//! Sidereal time follows the IAU 1982 GMST polynomial; transforms use the
//! standard spherical-triangle relations with azimuth measured from north
//! through east. Hour angles are kept in [-180°, 180°): negative east of the
//! meridian, positive west.

use qtty::{Degree, Degrees, HourAngle, HourAngles};

use super::{EquatorialCoords, HorizontalCoords};
use crate::models::JulianDate;

/// Clamp a cosine/sine argument into [-1, 1] before acos/asin. Spherical
/// trig on nearly coincident points drifts a few ulps outside the domain.
#[inline]
fn clamp_unit(x: f64) -> f64 {
    x.clamp(-1.0, 1.0)
}

/// Greenwich mean sidereal time, degrees in [0°, 360°).
pub fn greenwich_sidereal_time(jd: JulianDate) -> Degrees {
    let d = jd.value() - JulianDate::J2000.value();
    let t = jd.centuries_since_j2000().value();
    let gmst = 280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    Degrees::new(gmst).wrap_pos()
}

/// Local mean sidereal time for an east-positive longitude, degrees in
/// [0°, 360°).
pub fn local_sidereal_time(jd: JulianDate, longitude: Degrees) -> Degrees {
    (greenwich_sidereal_time(jd) + longitude).wrap_pos()
}

/// Hour angle of a target, degrees in [-180°, 180°).
pub fn hour_angle(jd: JulianDate, ra: HourAngles, longitude: Degrees) -> Degrees {
    (local_sidereal_time(jd, longitude) - ra.to::<Degree>()).wrap_signed_lo()
}

/// Altitude and azimuth of an equatorial position seen from a site.
pub fn equatorial_to_horizontal(
    jd: JulianDate,
    target: EquatorialCoords,
    latitude: Degrees,
    longitude: Degrees,
) -> HorizontalCoords {
    let ha = hour_angle(jd, target.ra, longitude);
    let (sin_ha, cos_ha) = ha.sin_cos();
    let (sin_dec, cos_dec) = target.dec.sin_cos();
    let (sin_lat, cos_lat) = latitude.sin_cos();

    let sin_alt = clamp_unit(sin_lat * sin_dec + cos_lat * cos_dec * cos_ha);
    let alt = Degrees::new(sin_alt.asin().to_degrees());

    let az_y = -sin_ha * cos_dec;
    let az_x = cos_lat * sin_dec - sin_lat * cos_dec * cos_ha;
    let az = Degrees::new(az_y.atan2(az_x).to_degrees()).wrap_pos();

    HorizontalCoords::new(alt, az)
}

/// Angle from the zenith to an equatorial position, degrees in [0°, 180°].
pub fn zenith_distance(
    jd: JulianDate,
    target: EquatorialCoords,
    latitude: Degrees,
    longitude: Degrees,
) -> Degrees {
    let ha = hour_angle(jd, target.ra, longitude);
    let (sin_dec, cos_dec) = target.dec.sin_cos();
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let cos_z = clamp_unit(sin_lat * sin_dec + cos_lat * cos_dec * ha.cos());
    Degrees::new(cos_z.acos().to_degrees())
}

/// Invert [`equatorial_to_horizontal`]: recover RA/Dec from a pointing in
/// the horizontal frame at a given instant.
pub fn horizontal_to_equatorial(
    jd: JulianDate,
    pointing: HorizontalCoords,
    latitude: Degrees,
    longitude: Degrees,
) -> EquatorialCoords {
    let (sin_alt, cos_alt) = pointing.alt.sin_cos();
    let (sin_az, cos_az) = pointing.az.sin_cos();
    let (sin_lat, cos_lat) = latitude.sin_cos();

    let sin_dec = clamp_unit(sin_lat * sin_alt + cos_lat * cos_alt * cos_az);
    let dec = Degrees::new(sin_dec.asin().to_degrees());

    let ha_y = -sin_az * cos_alt;
    let ha_x = cos_lat * sin_alt - sin_lat * cos_alt * cos_az;
    let ha = Degrees::new(ha_y.atan2(ha_x).to_degrees());

    let ra = (local_sidereal_time(jd, longitude) - ha).wrap_pos();
    EquatorialCoords::new(ra.to::<HourAngle>(), dec)
}
