//! Configuration commands

use std::sync::Arc;

use colored::Colorize;

use crate::cli::{CommandContext, OutputFormat};
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::output::json;

/// Show the effective configuration
pub fn show(ctx: &CommandContext) -> Result<()> {
    let config = ctx.settings.config();

    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(config)?),
        _ => {
            println!(
                "{} {}",
                "Config file:".bold(),
                ctx.settings.path().display().to_string().cyan()
            );
            println!();
            let yaml = serde_yaml::to_string(config).map_err(ConfigError::from)?;
            print!("{}", yaml);
        }
    }
    Ok(())
}

/// Set one key and save
pub fn set(ctx: &mut CommandContext, key: &str, value: &str) -> Result<()> {
    // Horoscopes cached from the old host are dropped when the host changes
    let previous_host = ctx.settings.config().api_host.clone();
    let cache = Arc::clone(&ctx.cache);
    ctx.settings.subscribe(move |config: &Config| {
        if config.api_host != previous_host
            && let Ok(cache) = cache.lock()
        {
            let removed = cache.clear_all("horoscope_");
            log::debug!("api_host changed, dropped {} cached horoscopes", removed);
        }
    });

    ctx.settings.update(|config| config.set_key(key, value))?;

    println!(
        "{} Set {} in {}",
        "✓".green(),
        key.bold(),
        ctx.settings.path().display()
    );
    Ok(())
}

/// Print config file path
pub fn path(ctx: &CommandContext) -> Result<()> {
    println!("{}", ctx.settings.path().display());
    Ok(())
}
