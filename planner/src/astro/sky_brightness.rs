//! Scattered-moonlight sky model.
//!
//! Single-scattering radiative transfer: moonlight enters the atmosphere
//! with a flux set by the lunar phase, scatters off molecules (Rayleigh)
//! and aerosols (Henyey-Greenstein), and the resulting intensity along the
//! target's line of sight converts to a sky surface brightness in
//! mag/arcsec^2. A pointing is moonlight-free when the sky stays dimmer
//! than the configured threshold.
//!
//! All parameters (wavelength, optical depths, phase-function shapes,
//! threshold) come from [`SkyModelConfig`].

use std::f64::consts::PI;

use qtty::Degrees;

use crate::config::SkyModelConfig;

/// Arcseconds per radian, for the per-arcsec^2 solid-angle term.
const ARCSEC_PER_RADIAN: f64 = 206_265.0;

/// AB zero point in jansky.
const AB_ZERO_POINT_JY: f64 = 3631.0;

/// Floor substituted for nonpositive intensities before the log.
const MIN_INTENSITY: f64 = 1e-25;

/// Secant differences below this use the analytic limit of the
/// path-integral quotient.
const SECANT_EPSILON: f64 = 1e-9;

/// log10 of the Planck spectral radiance at a wavelength (micrometers) and
/// temperature (kelvin), in the jansky-based bookkeeping the surface
/// brightness conversion expects.
fn log_planck_radiance(wavelength_um: f64, temperature_k: f64) -> f64 {
    let freq_ghz = 2.998e5 / wavelength_um;
    let beta = (6.626 / 1.381) / 100.0;
    2.0f64.log10() + (6.626f64.log10() - 34.0) - 2.0 * (2.998f64.log10() + 8.0)
        + 3.0 * freq_ghz.log10()
        + 27.0
        - ((beta * freq_ghz / temperature_k).exp() - 1.0).log10()
}

/// Lambertian phase-folded lunar albedo. Zero at new moon, maximal at
/// full; angles past 180 degrees fold back.
fn phase_folded_albedo(phase_angle: Degrees, albedo: f64) -> f64 {
    let mut alpha = phase_angle.value();
    if alpha > 180.0 {
        alpha = 360.0 - alpha;
    }
    let a = alpha.to_radians();
    albedo * (a.sin() - a * a.cos())
}

/// Top-of-atmosphere moonlight flux for a given lunar phase angle.
pub fn lunar_flux(phase_angle: Degrees, cfg: &SkyModelConfig) -> f64 {
    let log_sun_flux = PI.log10()
        + log_planck_radiance(cfg.wavelength_um, cfg.sun_temperature_k)
        + 2.0 * (cfg.sun_radius_km / cfg.sun_distance_km).log10();
    let sun_flux = 10f64.powf(log_sun_flux);

    let moon_solid_angle = (cfg.moon_radius_km / cfg.moon_distance_km).powi(2);
    sun_flux * moon_solid_angle * phase_folded_albedo(phase_angle, cfg.moon_albedo) / (4.0 * PI)
}

/// Vertical Rayleigh optical depth at the configured wavelength and
/// surface pressure.
pub fn rayleigh_optical_depth(cfg: &SkyModelConfig) -> f64 {
    let lam = cfg.wavelength_um;
    (cfg.site_pressure_hpa / 1013.25)
        * 0.008_569
        * lam.powi(-4)
        * (1.0 + 0.0113 / lam.powi(2) + 0.000_13 / lam.powi(4))
}

/// Vertical aerosol optical depth, Angstrom-scaled from 550 nm.
pub fn aerosol_optical_depth(cfg: &SkyModelConfig) -> f64 {
    cfg.aerosol_tau_550 * (cfg.wavelength_um / 0.55).powf(-cfg.angstrom_exponent)
}

/// Rayleigh phase function with depolarization.
fn rayleigh_phase(cos_theta: f64, depolarization: f64) -> f64 {
    let chi = depolarization;
    let coef = 3.0 * (1.0 - chi) / (16.0 * PI * (1.0 + 2.0 * chi));
    coef * ((1.0 + 3.0 * chi) / (1.0 - chi) + cos_theta * cos_theta)
}

/// Henyey-Greenstein aerosol phase function.
fn henyey_greenstein_phase(cos_theta: f64, g: f64) -> f64 {
    (1.0 - g * g) / (4.0 * PI * (1.0 + g * g - 2.0 * g * cos_theta).powf(1.5))
}

/// Scattered-moonlight intensity along a line of sight.
///
/// * `flux` - top-of-atmosphere moonlight flux from [`lunar_flux`]
/// * `separation` - angle between the pointing and the moon
/// * `target_zenith`, `moon_zenith` - zenith distances of both
///
/// Zero when the target or the moon sit at or below the horizon; when the
/// two airmasses coincide the difference quotient of the path integral is
/// replaced by its analytic limit.
pub fn scattered_intensity(
    flux: f64,
    separation: Degrees,
    target_zenith: Degrees,
    moon_zenith: Degrees,
    cfg: &SkyModelConfig,
) -> f64 {
    if target_zenith.value() >= 90.0 || moon_zenith.value() >= 90.0 {
        return 0.0;
    }

    let tau_r = rayleigh_optical_depth(cfg);
    let tau_a = aerosol_optical_depth(cfg);
    let tau = tau_r + tau_a;

    let cos_theta = separation.cos();
    let phase = (tau_a * henyey_greenstein_phase(cos_theta, cfg.hg_asymmetry)
        + tau_r * rayleigh_phase(cos_theta, cfg.rayleigh_depolarization))
        / tau;

    let x_target = 1.0 / target_zenith.cos();
    let x_moon = 1.0 / moon_zenith.cos();

    let path_term = if (x_moon - x_target).abs() < SECANT_EPSILON {
        tau * (-tau * x_target).exp()
    } else {
        ((-tau * x_target).exp() - (-tau * x_moon).exp()) / (x_moon - x_target)
    };

    flux * phase * (tau_a / tau) * x_target * path_term
}

/// Sky surface brightness in mag/arcsec^2 for a scattered intensity.
/// Nonpositive intensities floor at a dark-sky value.
pub fn surface_brightness(intensity: f64) -> f64 {
    let i = if intensity > 0.0 { intensity } else { MIN_INTENSITY };
    -2.5 * (i.log10() - 2.0 * ARCSEC_PER_RADIAN.log10() - (AB_ZERO_POINT_JY.log10() - 26.0))
}
