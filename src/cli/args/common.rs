//! Common CLI types shared across commands

use chrono::{Local, NaiveDate};
use clap::ValueEnum;

use crate::error::Result;
use crate::lunar::parse_date;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - human-optimized rich formatting (default)
    #[default]
    Pretty,
    /// Table format - one row per entry
    Table,
    /// JSON format - structured for scripts
    Json,
}

impl OutputFormat {
    /// Parse a format name as stored in the config file
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

/// Parse `--date`, defaulting to today in the local zone
pub fn resolve_date(input: Option<&str>) -> Result<NaiveDate> {
    match input {
        Some(s) => parse_date(s),
        None => Ok(Local::now().date_naive()),
    }
}
