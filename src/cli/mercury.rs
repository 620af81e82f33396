//! Mercury retrograde command

use colored::Colorize;

use crate::cache::CacheTtl;
use crate::cache::key::mercury_key;
use crate::cli::args::resolve_date;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::mercury::{MercuryStatus, status_on};
use crate::output::{json, table};

/// Run the mercury command
pub fn run(ctx: &CommandContext, date: Option<&str>) -> Result<()> {
    let date = resolve_date(date)?;
    let status: MercuryStatus = ctx.cached(&mercury_key(date), CacheTtl::MERCURY, || {
        status_on(date)
    });

    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&status)?),
        OutputFormat::Table => {
            let fields = [
                ("Date", status.date.to_string()),
                ("Retrograde", status.is_retrograde.to_string()),
                ("Period", period_text(&status)),
                ("Days remaining", days_text(status.days_remaining)),
                ("Days until next", days_text(status.days_until)),
                ("Advice", status.advice.clone()),
            ];
            println!("{}", table::format_record(&fields));
        }
        OutputFormat::Pretty => {
            if status.is_retrograde {
                println!("☿ Mercury is {}", "retrograde".red().bold());
            } else {
                println!("☿ Mercury is {}", "direct".green().bold());
            }
            println!();

            match (status.period, status.days_remaining, status.days_until) {
                (Some(period), Some(days), _) => {
                    println!("  Period     {} to {}", period.start, period.end);
                    println!("  Remaining  {} day(s)", days);
                }
                (Some(period), None, Some(days)) => {
                    println!("  Next       {} to {}", period.start, period.end);
                    println!("  Starts in  {} day(s)", days);
                }
                _ => println!("  {}", "No upcoming retrograde period on record".dimmed()),
            }

            println!();
            println!("{}", status.advice);
        }
    }

    Ok(())
}

fn period_text(status: &MercuryStatus) -> String {
    status
        .period
        .map(|p| format!("{} to {}", p.start, p.end))
        .unwrap_or_else(|| "--".to_string())
}

fn days_text(days: Option<i64>) -> String {
    days.map(|d| d.to_string()).unwrap_or_else(|| "--".to_string())
}
