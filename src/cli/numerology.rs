//! Numerology command

use colored::Colorize;

use crate::cache::CacheTtl;
use crate::cache::key::numerology_key;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::horoscope::ZodiacSign;
use crate::models::{CompatibilityReport, NumberDisplay};
use crate::numerology::{
    LifePathSteps, NumerologyProfile, compatibility, meaning, parse_birth_date, profile,
};
use crate::output::formatters::percent_bar;
use crate::output::{Formattable, json, table};

/// Run the numerology command
pub fn run(ctx: &CommandContext, birth_date: &str, compare: Option<&str>) -> Result<()> {
    let first = load_profile(ctx, birth_date)?;

    match compare {
        None => show_profile(ctx.format, &first),
        Some(other) => {
            let second = load_profile(ctx, other)?;
            let report = CompatibilityReport {
                compatibility_percent: compatibility(first.life_path, second.life_path),
                first,
                second,
            };
            show_compatibility(ctx.format, &report)
        }
    }
}

fn load_profile(ctx: &CommandContext, input: &str) -> Result<NumerologyProfile> {
    let date = parse_birth_date(input)?;
    Ok(ctx.cached(&numerology_key(date), CacheTtl::NUMEROLOGY, || {
        profile(date)
    }))
}

fn show_profile(format: OutputFormat, p: &NumerologyProfile) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", json::format_json(p)?),
        OutputFormat::Table => NumberDisplay::rows(p).print(format)?,
        OutputFormat::Pretty => {
            let sign = ZodiacSign::for_date(p.birth_date);
            println!(
                "{} {}  {} {}",
                "Numerology for".bold(),
                p.birth_date.to_string().bold(),
                sign.symbol(),
                sign.to_string().dimmed()
            );
            println!();
            println!(
                "  Life path {}  {}",
                p.life_path.to_string().cyan().bold(),
                meaning(p.life_path)
            );
            println!("  {}", steps(&p.life_path_steps).dimmed());
            println!();
            NumberDisplay::rows(p).print(format)?;
            println!();
            println!(
                "  Strength  {} {}%",
                percent_bar(p.strength, 20).magenta(),
                p.strength
            );
        }
    }
    Ok(())
}

fn show_compatibility(format: OutputFormat, report: &CompatibilityReport) -> Result<()> {
    let (a, b) = (&report.first, &report.second);
    match format {
        OutputFormat::Json => println!("{}", json::format_json(report)?),
        OutputFormat::Table => {
            let fields = [
                ("First", format!("{} (life path {})", a.birth_date, a.life_path)),
                ("Second", format!("{} (life path {})", b.birth_date, b.life_path)),
                ("Compatibility", format!("{}%", report.compatibility_percent)),
            ];
            println!("{}", table::format_record(&fields));
        }
        OutputFormat::Pretty => {
            println!("{}", "Life path compatibility".bold());
            println!();
            println!(
                "  {}  life path {} ({})",
                a.birth_date,
                a.life_path.to_string().cyan(),
                meaning(a.life_path)
            );
            println!(
                "  {}  life path {} ({})",
                b.birth_date,
                b.life_path.to_string().cyan(),
                meaning(b.life_path)
            );
            println!();
            println!(
                "  {} {}%",
                percent_bar(report.compatibility_percent, 20).magenta(),
                report.compatibility_percent
            );
        }
    }
    Ok(())
}

/// `15 → 6 · 5 · 1990 → 19 → 10 → 1 ⇒ 12 → 3`
fn steps(s: &LifePathSteps) -> String {
    let chain = |c: &[u32]| {
        c.iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" → ")
    };
    format!(
        "{} · {} · {} ⇒ {}",
        chain(&s.day),
        chain(&s.month),
        chain(&s.year),
        chain(&s.total)
    )
}
