//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod cache;
pub mod config;
pub mod context;
pub mod events;
pub mod horoscope;
pub mod mercury;
pub mod moon;
pub mod numerology;

pub use args::OutputFormat;
pub use context::CommandContext;

/// astrokit - moon phases, numerology and daily horoscopes in the terminal
#[derive(Parser, Debug)]
#[command(name = "astrokit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "ASTROKIT_FORMAT",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: Option<OutputFormat>,

    /// Override config file location
    #[arg(long, global = true, env = "ASTROKIT_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override cache directory
    #[arg(long, global = true, env = "ASTROKIT_CACHE_DIR", hide_env = true)]
    pub cache_dir: Option<String>,

    /// Use a temporary in-memory cache for this run
    #[arg(long, global = true, env = "ASTROKIT_NO_CACHE", hide_env = true)]
    pub no_cache: bool,

    /// Enable debug logging
    #[arg(long, global = true, env = "ASTROKIT_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Horoscope service host (e.g. http://localhost:8080)
    #[arg(long, global = true, env = "ASTROKIT_API_HOST", hide_env = true)]
    pub api_host: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the moon phase for a day
    #[command(after_help = "EXAMPLES:\n  \
            astrokit moon\n  \
            astrokit moon --date 2025-08-29\n  \
            astrokit moon --lat 51.5 --lon -0.12")]
    Moon {
        /// Day to compute (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,

        /// Observer latitude (-90 to 90)
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Observer longitude (-180 to 180)
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// List upcoming new, full and quarter moons
    Events {
        /// First day to scan (YYYY-MM-DD, default today)
        #[arg(long)]
        from: Option<String>,

        /// Number of days to look ahead (default from config, 30)
        #[arg(long, short = 'd', value_parser = clap::value_parser!(u32).range(1..=3660))]
        days: Option<u32>,
    },

    /// Compute numerology numbers for a birth date
    #[command(after_help = "EXAMPLES:\n  \
            astrokit numerology 1990-05-15\n  \
            astrokit numerology 1990-05-15 --compare 1988-11-02")]
    Numerology {
        /// Birth date (YYYY-MM-DD)
        birth_date: String,

        /// Second birth date for a life path compatibility check
        #[arg(long)]
        compare: Option<String>,
    },

    /// Show the daily horoscope
    #[command(after_help = "EXAMPLES:\n  \
            astrokit horoscope aries\n  \
            astrokit horoscope leo --date 2025-08-29\n  \
            astrokit horoscope --all")]
    Horoscope {
        /// Zodiac sign (default from config)
        #[arg(conflicts_with = "all")]
        sign: Option<String>,

        /// Day of the horoscope (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,

        /// Show all twelve signs
        #[arg(long)]
        all: bool,
    },

    /// Show whether Mercury is retrograde
    Mercury {
        /// Day to check (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Manage the local cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// View and edit configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    #[command(after_help = "\
Examples:
  bash:   astrokit completion bash > /etc/bash_completion.d/astrokit
  zsh:    astrokit completion zsh > \"${fpath[1]}/_astrokit\"
  fish:   astrokit completion fish > ~/.config/fish/completions/astrokit.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Display version information
    Version,
}

/// Cache management subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Status,
    /// List cached entries
    List,
    /// Remove expired and unreadable entries
    Purge,
    /// Clear all cached data
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Print cache directory path
    Path,
    /// Remove one entry by key (as shown by `cache list`)
    Invalidate {
        /// Entry key, e.g. horoscope_leo_2025-08-29
        key: String,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set a configuration value
    #[command(after_help = "EXAMPLES:\n  \
            astrokit config set default_sign leo\n  \
            astrokit config set location 51.5,-0.12\n  \
            astrokit config set preferences.format table")]
    Set {
        /// Key to set
        #[arg(value_parser = clap::builder::PossibleValuesParser::new(crate::config::KEYS))]
        key: String,
        /// New value
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Print config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_moon_accepts_negative_coordinates() {
        let cli = Cli::parse_from(["astrokit", "moon", "--lat", "-33.9", "--lon", "-70.6"]);
        match cli.command {
            Commands::Moon { lat, lon, .. } => {
                assert_eq!(lat, Some(-33.9));
                assert_eq!(lon, Some(-70.6));
            }
            other => panic!("Expected moon, got {:?}", other),
        }
    }

    #[test]
    fn test_lat_requires_lon() {
        assert!(Cli::try_parse_from(["astrokit", "moon", "--lat", "10"]).is_err());
    }

    #[test]
    fn test_horoscope_sign_conflicts_with_all() {
        assert!(Cli::try_parse_from(["astrokit", "horoscope", "leo", "--all"]).is_err());
    }

    #[test]
    fn test_config_set_rejects_unknown_key() {
        assert!(Cli::try_parse_from(["astrokit", "config", "set", "color", "blue"]).is_err());
    }
}
