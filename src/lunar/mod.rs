//! Lunar phase calculation
//!
//! Closed-form approximation of the moon's age from a fixed reference new
//! moon. Good to within a day or so, which is all the daily views need.
//! Every function here is pure and total: no I/O, no failure modes.

pub mod events;
pub mod recommendations;

use std::f64::consts::PI;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use events::{LunarEvent, LunarEventType, UpcomingEvents, upcoming_events};
pub use recommendations::{Recommendations, recommendations_for};

/// Mean length of the synodic month in days
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_68;

/// Reference new moon: 2000-01-06 18:14 UTC, in Unix milliseconds
const REFERENCE_NEW_MOON_MS: i64 = 947_182_440_000;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Upper (exclusive) age bound of each phase bucket, in cycle order.
/// Anything at or past the last bound wraps back to `New`.
const PHASE_BOUNDS: [(f64, MoonPhase); 8] = [
    (1.85, MoonPhase::New),
    (5.54, MoonPhase::WaxingCrescent),
    (9.23, MoonPhase::FirstQuarter),
    (12.92, MoonPhase::WaxingGibbous),
    (16.61, MoonPhase::Full),
    (20.30, MoonPhase::WaningGibbous),
    (23.99, MoonPhase::LastQuarter),
    (27.68, MoonPhase::WaningCrescent),
];

/// The eight conventional phase categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    #[cfg(test)]
    pub const ALL: [MoonPhase; 8] = [
        MoonPhase::New,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::Full,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    /// Classify a moon age (days since new moon) into its phase bucket
    pub fn from_age(age_days: f64) -> Self {
        PHASE_BOUNDS
            .iter()
            .find(|(upper, _)| age_days < *upper)
            .map(|(_, phase)| *phase)
            .unwrap_or(MoonPhase::New)
    }

    /// Symbolic tag shown next to the phase name
    pub fn emoji(&self) -> &'static str {
        match self {
            MoonPhase::New => "🌑",
            MoonPhase::WaxingCrescent => "🌒",
            MoonPhase::FirstQuarter => "🌓",
            MoonPhase::WaxingGibbous => "🌔",
            MoonPhase::Full => "🌕",
            MoonPhase::WaningGibbous => "🌖",
            MoonPhase::LastQuarter => "🌗",
            MoonPhase::WaningCrescent => "🌘",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MoonPhase::New => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::Full => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Observer position. Accepted and carried through, but the approximation
/// does not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Validate latitude/longitude ranges
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(Error::InvalidInput(format!(
                "latitude {} is outside -90..=90",
                lat
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(Error::InvalidInput(format!(
                "longitude {} is outside -180..=180",
                lon
            )));
        }
        Ok(Self { lat, lon })
    }
}

/// Everything the views show about the moon on a given day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonPhaseDescriptor {
    /// Calendar date the descriptor was computed for
    pub date: NaiveDate,

    /// Days since the last new moon, two decimal places, in `[0, SYNODIC_MONTH_DAYS)`
    pub age_days: f64,

    /// Lit fraction of the disc, 0-100
    pub illumination_percent: u8,

    pub phase: MoonPhase,

    /// True for the first half of the cycle
    pub is_waxing: bool,

    /// 1-based day of the lunar month
    pub lunar_day: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observer: Option<Coordinates>,
}

impl MoonPhaseDescriptor {
    pub fn emoji(&self) -> &'static str {
        self.phase.emoji()
    }
}

/// Compute the phase descriptor for an instant
pub fn compute_phase(at: DateTime<Utc>) -> MoonPhaseDescriptor {
    let elapsed_days = (at.timestamp_millis() - REFERENCE_NEW_MOON_MS) as f64 / MS_PER_DAY;
    let age_days = round2(elapsed_days.rem_euclid(SYNODIC_MONTH_DAYS));

    MoonPhaseDescriptor {
        date: at.date_naive(),
        age_days,
        illumination_percent: illumination_percent(age_days),
        phase: MoonPhase::from_age(age_days),
        is_waxing: age_days < SYNODIC_MONTH_DAYS / 2.0,
        lunar_day: (age_days.floor() as u8 + 1).min(30),
        observer: None,
    }
}

/// Compute the phase for a calendar date, sampled at midday UTC
pub fn compute_phase_for_date(date: NaiveDate) -> MoonPhaseDescriptor {
    compute_phase(date.and_time(midday()).and_utc())
}

/// Compute the phase for a calendar date and optional observer
pub fn compute_phase_at(date: NaiveDate, observer: Option<Coordinates>) -> MoonPhaseDescriptor {
    MoonPhaseDescriptor {
        observer,
        ..compute_phase_for_date(date)
    }
}

/// `round(50 * (1 - cos(2π * age / synodic)))`
pub fn illumination_percent(age_days: f64) -> u8 {
    let angle = 2.0 * PI * age_days / SYNODIC_MONTH_DAYS;
    (50.0 * (1.0 - angle.cos())).round().clamp(0.0, 100.0) as u8
}

/// Parse an ISO `YYYY-MM-DD` date at the input boundary
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        Error::InvalidInput(format!("date '{}' is not a valid YYYY-MM-DD date", input))
    })
}

fn midday() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_known_date_first_quarter() {
        let moon = compute_phase_for_date(date(2025, 8, 29));

        assert_eq!(moon.phase, MoonPhase::FirstQuarter);
        // Calibration check only; the closed form is within a few percent
        assert!(
            (26..=33).contains(&moon.illumination_percent),
            "illumination {}",
            moon.illumination_percent
        );
        assert!(moon.is_waxing);
    }

    #[test]
    fn test_full_moon_september_2025() {
        let moon = compute_phase_for_date(date(2025, 9, 7));
        assert_eq!(moon.phase, MoonPhase::Full);
        assert!(moon.illumination_percent >= 99);
    }

    #[test]
    fn test_reference_epoch_is_new_moon() {
        let at = Utc.with_ymd_and_hms(2000, 1, 6, 18, 14, 0).unwrap();
        let moon = compute_phase(at);

        assert_eq!(moon.age_days, 0.0);
        assert_eq!(moon.illumination_percent, 0);
        assert_eq!(moon.phase, MoonPhase::New);
        assert_eq!(moon.lunar_day, 1);
    }

    #[test]
    fn test_deterministic() {
        let at = Utc.with_ymd_and_hms(2031, 3, 14, 7, 30, 0).unwrap();
        let first = compute_phase(at);
        for _ in 0..10 {
            assert_eq!(compute_phase(at), first);
        }
    }

    #[test]
    fn test_cyclic_invariant() {
        let synodic_ms = (SYNODIC_MONTH_DAYS * MS_PER_DAY).round() as i64;
        let mut at = Utc.with_ymd_and_hms(1987, 6, 1, 0, 0, 0).unwrap();

        for _ in 0..50 {
            let a = compute_phase(at).age_days;
            let b = compute_phase(at + Duration::milliseconds(synodic_ms)).age_days;
            // Ages just below the wrap point may round across it
            let diff = (a - b).abs();
            let wrapped = diff.min(SYNODIC_MONTH_DAYS - diff);
            assert!(wrapped <= 0.011, "{} vs {} at {}", a, b, at);
            at += Duration::hours(173);
        }
    }

    #[test]
    fn test_range_invariants_before_and_after_epoch() {
        let mut at = Utc.with_ymd_and_hms(1850, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2150, 1, 1, 0, 0, 0).unwrap();

        while at < end {
            let moon = compute_phase(at);
            assert!(moon.age_days >= 0.0);
            assert!(moon.age_days < SYNODIC_MONTH_DAYS);
            assert!(moon.illumination_percent <= 100);
            assert!((1..=30).contains(&moon.lunar_day));
            at += Duration::hours(1_237);
        }
    }

    #[test]
    fn test_phase_buckets() {
        assert_eq!(MoonPhase::from_age(0.0), MoonPhase::New);
        assert_eq!(MoonPhase::from_age(1.84), MoonPhase::New);
        assert_eq!(MoonPhase::from_age(1.85), MoonPhase::WaxingCrescent);
        assert_eq!(MoonPhase::from_age(7.0), MoonPhase::FirstQuarter);
        assert_eq!(MoonPhase::from_age(10.0), MoonPhase::WaxingGibbous);
        assert_eq!(MoonPhase::from_age(14.77), MoonPhase::Full);
        assert_eq!(MoonPhase::from_age(18.0), MoonPhase::WaningGibbous);
        assert_eq!(MoonPhase::from_age(22.15), MoonPhase::LastQuarter);
        assert_eq!(MoonPhase::from_age(25.0), MoonPhase::WaningCrescent);
        assert_eq!(MoonPhase::from_age(27.68), MoonPhase::New);
        assert_eq!(MoonPhase::from_age(29.5), MoonPhase::New);
    }

    #[test]
    fn test_illumination_extremes() {
        assert_eq!(illumination_percent(0.0), 0);
        assert_eq!(illumination_percent(SYNODIC_MONTH_DAYS / 2.0), 100);
        assert_eq!(illumination_percent(SYNODIC_MONTH_DAYS / 4.0), 50);
    }

    #[test]
    fn test_waxing_flips_at_half_cycle() {
        let moon = compute_phase_for_date(date(2025, 9, 7));
        assert!(moon.is_waxing); // 14.54 days
        let moon = compute_phase_for_date(date(2025, 9, 8));
        assert!(!moon.is_waxing); // 15.54 days
    }

    #[test]
    fn test_observer_is_carried_through() {
        let here = Coordinates::new(55.75, 37.62).unwrap();
        let with = compute_phase_at(date(2025, 8, 29), Some(here));
        let without = compute_phase_for_date(date(2025, 8, 29));

        assert_eq!(with.observer, Some(here));
        assert_eq!(with.age_days, without.age_days);
        assert_eq!(with.phase, without.phase);
    }

    #[test]
    fn test_coordinates_validation() {
        assert!(Coordinates::new(91.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.5).is_err());
        assert!(Coordinates::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2025-08-29").unwrap(), date(2025, 8, 29));
        assert_eq!(parse_date(" 1990-05-15 ").unwrap(), date(1990, 5, 15));
        assert!(matches!(parse_date("2025-02-30"), Err(Error::InvalidInput(_))));
        assert!(parse_date("29.08.2025").is_err());
    }

    #[test]
    fn test_descriptor_serde_keeps_shape() {
        let moon = compute_phase_for_date(date(2025, 8, 29));
        let json = serde_json::to_string(&moon).unwrap();

        assert!(json.contains("\"phase\":\"first_quarter\""));
        assert!(!json.contains("observer"));

        let back: MoonPhaseDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, moon);
    }
}
