//! Example planning a night of deep-sky observations.
//!
//! This example shows how to use the planner to:
//! 1. Describe the observing site and observation requests
//! 2. Scan the evening for astronomical darkness
//! 3. Check scattered-moonlight brightness toward each target
//! 4. Plan the route
//! 5. Walk through the resulting schedule
//!
//! To run this example:
//! ```bash
//! cargo run --example plan_night
//! ```

use anyhow::Context;
use chrono::TimeZone;
use chrono::Utc;
use qtty::{Degrees, HourAngles, Minutes};

use skytour::astro::EquatorialCoords;
use skytour::models::JulianDate;
use skytour::services::{night, visibility};
use skytour::{plan_route, ObstacleProfile, PlannerConfig, Site, Target};

fn request(name: &str, ra_hours: f64, dec_deg: f64, minutes: f64) -> skytour::Result<Target> {
    Target::new(
        name,
        EquatorialCoords::new(HourAngles::new(ra_hours), Degrees::new(dec_deg)),
        Minutes::new(minutes),
    )
}

fn main() -> anyhow::Result<()> {
    println!("=== Night Route Planning ===\n");

    // Step 1: Describe the site and the observation requests
    println!("1. Describing the site and observation requests...");
    let site = Site::default();
    let config = PlannerConfig::default();

    let targets = vec![
        request("M81 (Bode's Galaxy)", 9.926, 69.065, 25.0)?,
        request("M51 (Whirlpool Galaxy)", 13.498, 47.195, 30.0)?,
        request("M101 (Pinwheel Galaxy)", 14.054, 54.349, 25.0)?,
        request("M3 (globular cluster)", 13.703, 28.377, 15.0)?,
        request("M64 (Black Eye Galaxy)", 12.946, 21.683, 20.0)?,
        request("M104 (Sombrero Galaxy)", 12.666, -11.623, 20.0)?,
    ];

    println!(
        "   Site: {:.1} N, {:.1} E",
        site.latitude.value(),
        site.longitude.value()
    );
    println!("   Loaded {} observation requests\n", targets.len());

    // Step 2: Scan the evening for astronomical darkness
    println!("2. Scanning the evening for astronomical darkness...");
    let evening = Utc
        .with_ymd_and_hms(2026, 3, 20, 9, 30, 0)
        .single()
        .context("invalid start timestamp")?;
    let scan_from = JulianDate::from_datetime(&evening);
    let scan_to = JulianDate::new(scan_from.value() + 0.5);

    let windows = night::dark_windows(scan_from, scan_to, Minutes::new(5.0), &site);
    for (from, to) in &windows {
        println!(
            "   Dark from {} to {} UTC",
            from.to_datetime()?.format("%H:%M"),
            to.to_datetime()?.format("%H:%M")
        );
    }
    let start = windows.first().map(|w| w.0).unwrap_or(scan_from);
    let start_dt = start.to_datetime()?;
    println!();

    // Step 3: Sky brightness toward each target at the session start
    println!(
        "3. Scattered moonlight at {} UTC (threshold {:.1} mag/arcsec^2):",
        start_dt.format("%H:%M"),
        config.sky.brightness_threshold
    );
    for t in &targets {
        let brightness = visibility::sky_brightness_at(start, t.coords, &site, &config.sky);
        println!("   {:<26} {:>6.2} mag/arcsec^2", t.name, brightness);
    }
    println!();

    // Step 4: Plan the route
    println!("4. Planning the route...");
    let plan = plan_route(&targets, start_dt, &site, &ObstacleProfile::open(), &config);
    println!(
        "   Outcome: {:?} after {} epoch(s), {:.0} s total slew\n",
        plan.outcome,
        plan.epochs,
        plan.total_slew.value()
    );

    // Step 5: Walk through the schedule
    println!("5. Results:\n");
    println!("   Schedule:");
    println!("   ---------");
    for leg in &plan.legs {
        println!(
            "   • {} at {} UTC ({:.0} min)",
            targets[leg.target].name,
            leg.start.format("%H:%M:%S"),
            leg.duration.value()
        );
    }
    println!();

    let unscheduled = plan.unscheduled(targets.len());
    if !unscheduled.is_empty() {
        println!("   Unscheduled:");
        println!("   ------------");
        for i in unscheduled {
            println!("   • {}", targets[i].name);
        }
        println!();
    }
    println!(
        "   Session runs until {} UTC",
        plan.finished_at.format("%H:%M:%S")
    );

    println!("\n=== Planning Complete ===");
    Ok(())
}
