//! Moon phase command

use colored::Colorize;

use crate::cache::CacheTtl;
use crate::cache::key::moon_key;
use crate::cli::args::resolve_date;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::{Error, Result};
use crate::lunar::{Coordinates, MoonPhaseDescriptor, compute_phase_at, recommendations_for};
use crate::models::MoonReport;
use crate::output::formatters::percent_bar;
use crate::output::{json, table};

/// Run the moon command
pub fn run(
    ctx: &CommandContext,
    date: Option<&str>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<()> {
    let date = resolve_date(date)?;
    let observer = match (lat, lon) {
        (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)?),
        (None, None) => ctx.settings.config().location,
        _ => {
            return Err(Error::InvalidInput(
                "--lat and --lon must be given together".to_string(),
            ));
        }
    };

    let key = moon_key(date, observer.map(|c| (c.lat, c.lon)));
    let moon: MoonPhaseDescriptor =
        ctx.cached(&key, CacheTtl::MOON, || compute_phase_at(date, observer));

    let report = MoonReport {
        recommendations: recommendations_for(moon.phase),
        moon,
    };

    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&report)?),
        OutputFormat::Table => println!("{}", table::format_record(&record(&report))),
        OutputFormat::Pretty => print_pretty(&report),
    }

    Ok(())
}

fn record(report: &MoonReport) -> Vec<(&'static str, String)> {
    let moon = &report.moon;
    let mut fields = vec![
        ("Date", moon.date.to_string()),
        ("Phase", format!("{} {}", moon.emoji(), moon.phase)),
        ("Illumination", format!("{}%", moon.illumination_percent)),
        ("Age (days)", format!("{:.2}", moon.age_days)),
        ("Lunar day", moon.lunar_day.to_string()),
        ("Waxing", moon.is_waxing.to_string()),
    ];
    if let Some(observer) = moon.observer {
        fields.push(("Observer", format!("{:.2}, {:.2}", observer.lat, observer.lon)));
    }
    fields.push(("Energy", report.recommendations.energy_label.to_string()));
    fields.push(("Favorable", report.recommendations.favorable.join(", ")));
    fields.push(("Unfavorable", report.recommendations.unfavorable.join(", ")));
    fields
}

fn print_pretty(report: &MoonReport) {
    let moon = &report.moon;
    let trend = if moon.is_waxing { "waxing" } else { "waning" };

    println!(
        "{} {}  {}",
        moon.emoji(),
        moon.phase.to_string().bold(),
        moon.date.format("%A, %B %-d %Y").to_string().dimmed()
    );
    println!();
    println!(
        "  Illumination  {} {}%",
        percent_bar(moon.illumination_percent, 20).yellow(),
        moon.illumination_percent
    );
    println!(
        "  Age           {:.2} days ({}, lunar day {})",
        moon.age_days, trend, moon.lunar_day
    );
    if let Some(observer) = moon.observer {
        println!("  Observer      {:.2}, {:.2}", observer.lat, observer.lon);
    }

    let rec = &report.recommendations;
    println!();
    println!("{} {}", "Energy:".bold(), rec.energy_label);
    println!("{}", "Favorable".green().bold());
    for item in &rec.favorable {
        println!("  {} {}", "✓".green(), item);
    }
    println!("{}", "Unfavorable".red().bold());
    for item in &rec.unfavorable {
        println!("  {} {}", "✗".red(), item);
    }
}
