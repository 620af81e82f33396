//! Daily horoscope command

use std::sync::Arc;
use std::time::Duration;

use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::args::resolve_date;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::{Error, Result};
use crate::horoscope::{Horoscope, HoroscopeClient, HoroscopeService, HoroscopeSource, ZodiacSign};
use crate::models::HoroscopeDisplay;
use crate::output::{Formattable, json, table};

/// Run the horoscope command
pub async fn run(
    ctx: &CommandContext,
    sign: Option<&str>,
    date: Option<&str>,
    all: bool,
) -> Result<()> {
    let date = resolve_date(date)?;
    let client = HoroscopeClient::new(&ctx.api_host)?;
    log::debug!("Horoscope service at {}", client.base_url());
    let service = HoroscopeService::new(client, Arc::clone(&ctx.cache));

    if all {
        let spinner = spinner(ctx.format, "Fetching horoscopes for all signs...");
        let horoscopes = service.daily_all(date).await;
        spinner.finish_and_clear();

        return match ctx.format {
            OutputFormat::Json => {
                println!("{}", json::format_json(&horoscopes)?);
                Ok(())
            }
            format => {
                let rows: Vec<HoroscopeDisplay> =
                    horoscopes.into_iter().map(HoroscopeDisplay::from).collect();
                rows.print(format)
            }
        };
    }

    let sign = resolve_sign(ctx, sign)?;
    let spinner = spinner(ctx.format, &format!("Fetching horoscope for {}...", sign));
    let horoscope = service.daily(sign, date).await;
    spinner.finish_and_clear();

    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&horoscope)?),
        OutputFormat::Table => {
            let fields = [
                ("Sign", format!("{} {}", horoscope.sign.symbol(), horoscope.sign)),
                ("Date", horoscope.date.to_string()),
                ("Source", horoscope.source.label().to_string()),
                ("Horoscope", horoscope.text.clone()),
            ];
            println!("{}", table::format_record(&fields));
        }
        OutputFormat::Pretty => print_pretty(&horoscope),
    }

    Ok(())
}

/// Explicit sign, else the configured default
fn resolve_sign(ctx: &CommandContext, sign: Option<&str>) -> Result<ZodiacSign> {
    match sign {
        Some(s) => s.parse(),
        None => ctx.settings.config().default_sign.ok_or_else(|| {
            Error::InvalidInput(
                "No sign given. Pass one (e.g. `astrokit horoscope leo`) or run \
                 `astrokit config set default_sign <SIGN>`."
                    .to_string(),
            )
        }),
    }
}

fn spinner(format: OutputFormat, message: &str) -> ProgressBar {
    if format != OutputFormat::Pretty {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn source_badge(source: HoroscopeSource) -> ColoredString {
    let label = format!("[{}]", source.label());
    match source {
        HoroscopeSource::Live => label.green(),
        HoroscopeSource::Cached => label.cyan(),
        HoroscopeSource::Offline => label.yellow(),
    }
}

fn print_pretty(h: &Horoscope) {
    println!(
        "{} {}  {}  {}",
        h.sign.symbol(),
        h.sign.to_string().bold(),
        h.date.format("%A, %B %-d %Y").to_string().dimmed(),
        source_badge(h.source)
    );
    println!();
    println!("{}", h.text);

    if h.source == HoroscopeSource::Offline {
        println!();
        println!(
            "{}",
            "The horoscope service could not be reached; this reading was generated offline."
                .dimmed()
        );
    }
}
