//! Display model implementations for table and JSON output
//!
//! Display models give results column names for tables and a stable shape
//! for JSON.

mod cache;
mod common;
mod horoscope;
mod lunar;
mod numerology;

pub use cache::CacheEntryDisplay;
pub use horoscope::HoroscopeDisplay;
pub use lunar::{EventDisplay, MoonReport};
pub use numerology::{CompatibilityReport, NumberDisplay};
