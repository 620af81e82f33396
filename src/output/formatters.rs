//! Reusable formatting utilities for CLI output
//!
//! Timestamps, durations, sizes and the small text gauges the pretty views
//! print.

use chrono::{DateTime, Local};

/// Format epoch milliseconds as a local date/time string.
///
/// Returns "N/A" if the timestamp is zero or out of range.
///
/// # Example output
/// `08/29/2025 14:30 CET`
pub fn format_timestamp_local(epoch_ms: i64) -> String {
    if epoch_ms == 0 {
        return "N/A".to_string();
    }

    match DateTime::from_timestamp_millis(epoch_ms) {
        Some(dt) => {
            let local = dt.with_timezone(&Local);
            let date_time = local.format("%m/%d/%Y %H:%M").to_string();
            let tz_abbrev = offset_to_tz_abbrev(local.offset().local_minus_utc());
            format!("{} {}", date_time, tz_abbrev)
        }
        None => "N/A".to_string(),
    }
}

/// Convert a UTC offset (seconds) to a timezone abbreviation.
///
/// Uncommon offsets fall back to `UTC+N`.
pub fn offset_to_tz_abbrev(offset_secs: i32) -> String {
    let offset_hours = offset_secs / 3600;
    let abbrev = match offset_hours {
        -10 => "HST",
        -9 => "AKST",
        -8 => "PST",
        -7 => "MST",
        -6 => "CST",
        -5 => "EST",
        -3 => "ART",
        0 => "UTC",
        1 => "CET",
        2 => "EET",
        3 => "MSK",
        9 => "JST",
        10 => "AEST",
        12 => "NZST",
        _ => return format!("UTC{:+}", offset_hours),
    };
    abbrev.to_string()
}

/// Format a duration in milliseconds as `2h 15m 30s`, `5m 10s` or `45s`.
///
/// Zero or negative durations read "expired".
pub fn format_duration_ms(ms: i64) -> String {
    if ms <= 0 {
        return "expired".to_string();
    }

    let secs = ms / 1000;
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Format bytes as human-readable size
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;
    const GB: usize = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Fixed-width gauge for a 0-100 percentage, e.g. `███░░░░░░░`
pub fn percent_bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
