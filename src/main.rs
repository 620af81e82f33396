//! astrokit - moon phases, numerology and daily horoscopes in the terminal

use clap::{CommandFactory, Parser};

mod cache;
mod cli;
mod config;
mod error;
mod horoscope;
mod lunar;
mod mercury;
mod models;
mod numerology;
mod output;

use cli::args::GlobalOptions;
use cli::{CacheCommands, Cli, CommandContext, Commands, ConfigCommands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    // Commands that need no config or cache
    match &cli.command {
        Commands::Version => {
            println!("astrokit version {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Commands::Completion { shell } => {
            clap_complete::generate(
                *shell,
                &mut Cli::command(),
                "astrokit",
                &mut std::io::stdout(),
            );
            return Ok(());
        }
        _ => {}
    }

    let opts = GlobalOptions::from_cli(&cli);
    let mut ctx = CommandContext::new(&opts)?;
    log::debug!("Format {:?}, api host {}", ctx.format, ctx.api_host);

    match cli.command {
        Commands::Moon { date, lat, lon } => cli::moon::run(&ctx, date.as_deref(), lat, lon),
        Commands::Events { from, days } => cli::events::run(&ctx, from.as_deref(), days),
        Commands::Numerology {
            birth_date,
            compare,
        } => cli::numerology::run(&ctx, &birth_date, compare.as_deref()),
        Commands::Horoscope { sign, date, all } => {
            cli::horoscope::run(&ctx, sign.as_deref(), date.as_deref(), all).await
        }
        Commands::Mercury { date } => cli::mercury::run(&ctx, date.as_deref()),
        Commands::Cache(cache_cmd) => match cache_cmd {
            CacheCommands::Status => cli::cache::status(&ctx),
            CacheCommands::List => cli::cache::list(&ctx),
            CacheCommands::Purge => cli::cache::purge(&ctx),
            CacheCommands::Clear { yes } => cli::cache::clear(&ctx, yes),
            CacheCommands::Path => cli::cache::path(&ctx),
            CacheCommands::Invalidate { key } => cli::cache::invalidate(&ctx, &key),
        },
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Show => cli::config::show(&ctx),
            ConfigCommands::Set { key, value } => cli::config::set(&mut ctx, &key, &value),
            ConfigCommands::Path => cli::config::path(&ctx),
        },
        Commands::Version | Commands::Completion { .. } => Ok(()),
    }
}
