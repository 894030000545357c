//! Low-precision solar and lunar ephemerides.
//!
//! Truncated Meeus series: the largest periodic terms only, good to a few
//! arcminutes for the sun and roughly a quarter degree for the moon. That
//! is far below the angular scales the scheduler cares about (horizon
//! crossings, moon separation, clustering radii of degrees).

use qtty::{Degrees, HourAngle};

use super::EquatorialCoords;
use crate::algorithms::geometry::angular_distance;
use crate::models::JulianDate;

#[inline]
fn wrap360(x: f64) -> f64 {
    x.rem_euclid(360.0)
}

#[inline]
fn sin_deg(x: f64) -> f64 {
    x.to_radians().sin()
}

#[inline]
fn cos_deg(x: f64) -> f64 {
    x.to_radians().cos()
}

/// Apparent solar position at a Julian date.
pub fn sun_position(jd: JulianDate) -> EquatorialCoords {
    let t = jd.centuries_since_j2000().value();

    // Geometric mean longitude and mean anomaly.
    let l0 = 280.46646 + 36_000.76983 * t + 0.000_303_2 * t * t;
    let m = 357.52911 + 35_999.05029 * t - 0.000_153_7 * t * t - 0.000_000_48 * t * t * t;

    // Equation of center, three harmonics.
    let c = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * sin_deg(m)
        + (0.019_993 - 0.000_101 * t) * sin_deg(2.0 * m)
        + 0.000_289 * sin_deg(3.0 * m);

    // Apparent longitude, corrected for aberration and nutation in longitude.
    let omega = 125.04 - 1934.136 * t;
    let lambda = wrap360(l0 + c - 0.005_69 - 0.004_78 * sin_deg(omega));

    // True obliquity.
    let eps0 = 23.0 + 26.0 / 60.0 + 21.448 / 3600.0
        - (46.8150 / 3600.0) * t
        - (0.000_59 / 3600.0) * t * t
        + (0.001_813 / 3600.0) * t * t * t;
    let eps = eps0 + 0.002_56 * cos_deg(omega);

    // Ecliptic -> equatorial with zero ecliptic latitude.
    let dec = (sin_deg(lambda) * sin_deg(eps)).clamp(-1.0, 1.0).asin().to_degrees();
    let ra = wrap360(
        (sin_deg(lambda) * cos_deg(eps))
            .atan2(cos_deg(lambda))
            .to_degrees(),
    );

    EquatorialCoords::new(Degrees::new(ra).to::<HourAngle>(), Degrees::new(dec))
}

/// Apparent lunar position at a Julian date.
pub fn moon_position(jd: JulianDate) -> EquatorialCoords {
    let t = jd.centuries_since_j2000().value();

    // Fundamental arguments: mean longitude, mean elongation, solar and
    // lunar mean anomalies, argument of latitude.
    let l1 = wrap360(
        218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t * t + t.powi(3) / 538_841.0
            - t.powi(4) / 65_194_000.0,
    );
    let d = wrap360(
        297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t * t + t.powi(3) / 545_868.0
            - t.powi(4) / 113_065_000.0,
    );
    let m = wrap360(357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t * t + t.powi(3) / 24_490_000.0);
    let m1 = wrap360(
        134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t * t + t.powi(3) / 69_699.0
            - t.powi(4) / 14_712_000.0,
    );
    let f = wrap360(
        93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t * t - t.powi(3) / 3_526_000.0
            + t.powi(4) / 863_310_000.0,
    );

    // Principal periodic terms in longitude and latitude.
    let lon = l1
        + 6.289 * sin_deg(m1)
        + 1.274 * sin_deg(2.0 * d - m1)
        + 0.658 * sin_deg(2.0 * d)
        + 0.214 * sin_deg(2.0 * m1)
        - 0.186 * sin_deg(m)
        - 0.059 * sin_deg(2.0 * d - 2.0 * m1);
    let lat = 5.128 * sin_deg(f)
        + 0.280 * sin_deg(m1 + f)
        + 0.277 * sin_deg(m1 - f)
        + 0.173 * sin_deg(2.0 * d - f)
        + 0.055 * sin_deg(2.0 * d + f - m1);

    let eps = 23.439_291 - 0.013_004_2 * t;

    let sin_dec = (sin_deg(lat) * cos_deg(eps) + cos_deg(lat) * sin_deg(eps) * sin_deg(lon))
        .clamp(-1.0, 1.0);
    let dec = sin_dec.asin().to_degrees();

    let y = sin_deg(lon) * cos_deg(eps) - lat.to_radians().tan() * sin_deg(eps);
    let x = cos_deg(lon);
    let ra = wrap360(y.atan2(x).to_degrees());

    EquatorialCoords::new(Degrees::new(ra).to::<HourAngle>(), Degrees::new(dec))
}

/// Moon-sun separation (the lunar phase angle proxy): 0° near new moon,
/// 180° near full.
pub fn moon_phase_angle(jd: JulianDate) -> Degrees {
    angular_distance(moon_position(jd), sun_position(jd))
}
