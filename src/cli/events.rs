//! Upcoming lunar events command

use chrono::Duration;
use colored::Colorize;

use crate::cli::args::resolve_date;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::lunar::{LunarEvent, upcoming_events};
use crate::models::EventDisplay;
use crate::output::{Formattable, json};

/// Run the events command
pub fn run(ctx: &CommandContext, from: Option<&str>, days: Option<u32>) -> Result<()> {
    let from = resolve_date(from)?;
    let days = days.unwrap_or(ctx.settings.config().preferences.events_days);

    log::debug!("Scanning {} days from {} for lunar events", days, from);
    let events: Vec<LunarEvent> = upcoming_events(from, days).collect();

    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&events)?),
        format => {
            if format == OutputFormat::Pretty {
                let until = from
                    .checked_add_signed(Duration::days(i64::from(days)))
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "end of calendar".to_string());
                println!("{} {} to {}", "Lunar events".bold(), from, until);
                println!();
            }
            let rows: Vec<EventDisplay> = events.into_iter().map(EventDisplay::from).collect();
            rows.print(format)?;
        }
    }

    Ok(())
}
