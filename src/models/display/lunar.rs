//! Moon phase and lunar event display models

use serde::Serialize;
use tabled::Tabled;

use crate::lunar::{LunarEvent, MoonPhaseDescriptor, Recommendations};

/// Lunar event row for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct EventDisplay {
    #[tabled(rename = "DATE")]
    pub date: String,

    #[tabled(rename = "EVENT")]
    pub event: String,

    /// Moon age on that day, in days
    #[tabled(rename = "AGE")]
    pub age_days: String,
}

impl From<LunarEvent> for EventDisplay {
    fn from(event: LunarEvent) -> Self {
        Self {
            date: event.date.format("%a %Y-%m-%d").to_string(),
            event: event.label.to_string(),
            age_days: format!("{:.2}", event.age_days),
        }
    }
}

/// `moon` command result: the descriptor plus what the phase favors
#[derive(Debug, Clone, Serialize)]
pub struct MoonReport {
    #[serde(flatten)]
    pub moon: MoonPhaseDescriptor,
    pub recommendations: Recommendations,
}
