//! Display models for CLI output
//!
//! Converts calculator and cache results into table rows and JSON reports.

pub mod display;

pub use display::{
    CacheEntryDisplay, CompatibilityReport, EventDisplay, HoroscopeDisplay, MoonReport,
    NumberDisplay,
};
