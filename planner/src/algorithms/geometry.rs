//! Great-circle geometry and horizon-mask interpolation.
//!
//! Pure functions shared by the clustering, routing, and visibility layers.

use qtty::{Degree, Degrees};

use crate::astro::{EquatorialCoords, HorizontalCoords};

/// Tolerance for treating a query azimuth as an exact sample hit.
const AZIMUTH_HIT_TOLERANCE: f64 = 0.001;

/// Great-circle separation between two equatorial positions, in degrees.
///
/// Spherical law of cosines with the cosine clamped into [-1, 1];
/// coincident or antipodal points would otherwise leave the acos domain
/// by a few ulps and return NaN.
pub fn angular_distance(a: EquatorialCoords, b: EquatorialCoords) -> Degrees {
    let (sin_d1, cos_d1) = a.dec.sin_cos();
    let (sin_d2, cos_d2) = b.dec.sin_cos();
    let d_ra = a.ra.to::<Degree>() - b.ra.to::<Degree>();

    let cos_sep = (sin_d1 * sin_d2 + cos_d1 * cos_d2 * d_ra.cos()).clamp(-1.0, 1.0);
    Degrees::new(cos_sep.acos().to_degrees())
}

/// Horizon-mask altitude at a query azimuth, linearly interpolated between
/// the bracketing samples.
///
/// Samples may arrive in any order; the mask wraps across the 0°/360° seam
/// (a query outside the sampled span interpolates between the last and
/// first samples with one shifted by a full turn). Fewer than two samples
/// mean no mask: the altitude is 0°.
pub fn interpolate_obstacle_altitude(azimuth: Degrees, samples: &[HorizontalCoords]) -> Degrees {
    if samples.len() < 2 {
        return Degrees::new(0.0);
    }

    let query = azimuth.wrap_pos().value();
    let points: Vec<(f64, f64)> = samples
        .iter()
        .map(|s| (s.az.wrap_pos().value(), s.alt.value()))
        .collect();

    for &(az, alt) in &points {
        if (az - query).abs() < AZIMUTH_HIT_TOLERANCE {
            return Degrees::new(alt);
        }
    }

    // Bracket the query: greatest sample azimuth at or below it, and least
    // sample azimuth at or above it.
    let mut left: Option<(f64, f64)> = None;
    let mut right: Option<(f64, f64)> = None;
    for &(az, alt) in &points {
        if az <= query && left.map_or(true, |(l, _)| az > l) {
            left = Some((az, alt));
        }
        if az >= query && right.map_or(true, |(r, _)| az < r) {
            right = Some((az, alt));
        }
    }

    let max = points
        .iter()
        .fold(points[0], |acc, &p| if p.0 > acc.0 { p } else { acc });
    let min = points
        .iter()
        .fold(points[0], |acc, &p| if p.0 < acc.0 { p } else { acc });

    let (l, r) = match (left, right) {
        (Some(l), Some(r)) => (l, r),
        // Query beyond the last sample: wrap forward to the first.
        (Some(_), None) => (max, (min.0 + 360.0, min.1)),
        // Query before the first sample: wrap the last sample back.
        (None, Some(_)) => ((max.0 - 360.0, max.1), min),
        (None, None) => return Degrees::new(0.0),
    };

    let span = r.0 - l.0;
    if span.abs() < f64::EPSILON {
        // Degenerate bracket (duplicate azimuths): nearest sample wins.
        return Degrees::new(nearest_sample_altitude(query, &points));
    }

    let frac = (query - l.0) / span;
    Degrees::new(l.1 + (r.1 - l.1) * frac)
}

/// Altitude of the sample circularly closest to the query azimuth.
fn nearest_sample_altitude(query: f64, points: &[(f64, f64)]) -> f64 {
    let mut best = points[0];
    let mut best_dist = f64::MAX;
    for &(az, alt) in points {
        let delta = (az - query).abs();
        let dist = delta.min(360.0 - delta);
        if dist < best_dist {
            best_dist = dist;
            best = (az, alt);
        }
    }
    best.1
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use qtty::HourAngles;

    fn eq(ra_hours: f64, dec_deg: f64) -> EquatorialCoords {
        EquatorialCoords::new(HourAngles::new(ra_hours), Degrees::new(dec_deg))
    }

    fn sample(az: f64, alt: f64) -> HorizontalCoords {
        HorizontalCoords::new(Degrees::new(alt), Degrees::new(az))
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = eq(12.0, 45.0);
        assert_relative_eq!(angular_distance(p, p).value(), 0.0);
    }

    #[test]
    fn test_distance_on_equator() {
        // One hour of RA on the equator is 15 degrees.
        let d = angular_distance(eq(0.0, 0.0), eq(1.0, 0.0));
        assert_relative_eq!(d.value(), 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_distance_pole_to_pole() {
        let d = angular_distance(eq(3.0, 90.0), eq(17.0, -90.0));
        assert_relative_eq!(d.value(), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_distance_near_coincident_is_finite() {
        let a = eq(6.0, 30.0);
        let b = eq(6.0 + 1e-13, 30.0);
        let d = angular_distance(a, b);
        assert!(d.value().is_finite());
        assert!(d.value() >= 0.0);
    }

    #[test]
    fn test_obstacle_too_few_samples() {
        assert_relative_eq!(
            interpolate_obstacle_altitude(Degrees::new(100.0), &[]).value(),
            0.0
        );
        assert_relative_eq!(
            interpolate_obstacle_altitude(Degrees::new(100.0), &[sample(90.0, 20.0)]).value(),
            0.0
        );
    }

    #[test]
    fn test_obstacle_exact_hit() {
        let mask = [sample(90.0, 20.0), sample(180.0, 10.0)];
        let alt = interpolate_obstacle_altitude(Degrees::new(90.0), &mask);
        assert_relative_eq!(alt.value(), 20.0);
    }

    #[test]
    fn test_obstacle_interior_interpolation() {
        let mask = [sample(90.0, 20.0), sample(180.0, 10.0)];
        let alt = interpolate_obstacle_altitude(Degrees::new(135.0), &mask);
        assert_relative_eq!(alt.value(), 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_obstacle_unsorted_samples() {
        let mask = [sample(180.0, 10.0), sample(30.0, 6.0), sample(90.0, 20.0)];
        let alt = interpolate_obstacle_altitude(Degrees::new(60.0), &mask);
        assert_relative_eq!(alt.value(), 13.0, epsilon = 1e-9);
    }

    #[test]
    fn test_obstacle_wraps_above_max() {
        let mask = [sample(10.0, 5.0), sample(350.0, 15.0)];
        // 355° sits between 350° and 10°+360°.
        let alt = interpolate_obstacle_altitude(Degrees::new(355.0), &mask);
        assert_relative_eq!(alt.value(), 12.5, epsilon = 1e-9);
    }

    #[test]
    fn test_obstacle_wraps_below_min() {
        let mask = [sample(10.0, 5.0), sample(350.0, 15.0)];
        // 5° sits between 350°-360° and 10°.
        let alt = interpolate_obstacle_altitude(Degrees::new(5.0), &mask);
        assert_relative_eq!(alt.value(), 7.5, epsilon = 1e-9);
    }

    #[test]
    fn test_obstacle_duplicate_azimuths() {
        let mask = [sample(90.0, 20.0), sample(90.0 + 2e-3, 30.0), sample(270.0, 0.0)];
        let alt = interpolate_obstacle_altitude(Degrees::new(91.0), &mask);
        assert!(alt.value().is_finite());
    }

    proptest! {
        #[test]
        fn prop_distance_symmetric(
            ra1 in 0.0..24.0f64, dec1 in -90.0..90.0f64,
            ra2 in 0.0..24.0f64, dec2 in -90.0..90.0f64,
        ) {
            let d_ab = angular_distance(eq(ra1, dec1), eq(ra2, dec2));
            let d_ba = angular_distance(eq(ra2, dec2), eq(ra1, dec1));
            prop_assert!((d_ab.value() - d_ba.value()).abs() < 1e-9);
        }

        #[test]
        fn prop_distance_in_range(
            ra1 in 0.0..24.0f64, dec1 in -90.0..90.0f64,
            ra2 in 0.0..24.0f64, dec2 in -90.0..90.0f64,
        ) {
            let d = angular_distance(eq(ra1, dec1), eq(ra2, dec2));
            prop_assert!((0.0..=180.0).contains(&d.value()));
        }

        #[test]
        fn prop_interpolation_within_sample_bounds(
            q in 0.0..360.0f64,
            az1 in 0.0..360.0f64,
            alt1 in 0.0..90.0f64,
            az2 in 0.0..360.0f64,
            alt2 in 0.0..90.0f64,
        ) {
            let mask = [sample(az1, alt1), sample(az2, alt2)];
            let alt = interpolate_obstacle_altitude(Degrees::new(q), &mask).value();
            let lo = alt1.min(alt2) - 1e-9;
            let hi = alt1.max(alt2) + 1e-9;
            prop_assert!(alt >= lo && alt <= hi, "alt {} outside [{}, {}]", alt, lo, hi);
        }
    }
}
