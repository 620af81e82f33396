//! Mercury retrograde status
//!
//! Table lookup over published station dates (UTC calendar days, start and
//! end inclusive). Dates outside the table report direct motion with no
//! upcoming period.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrogradePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl RetrogradePeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

const PERIODS: [(i32, u32, u32, i32, u32, u32); 12] = [
    (2024, 4, 1, 2024, 4, 25),
    (2024, 8, 5, 2024, 8, 28),
    (2024, 11, 25, 2024, 12, 15),
    (2025, 3, 15, 2025, 4, 7),
    (2025, 7, 18, 2025, 8, 11),
    (2025, 11, 9, 2025, 11, 29),
    (2026, 2, 26, 2026, 3, 20),
    (2026, 6, 29, 2026, 7, 23),
    (2026, 10, 24, 2026, 11, 13),
    (2027, 2, 9, 2027, 3, 3),
    (2027, 6, 10, 2027, 7, 4),
    (2027, 10, 7, 2027, 10, 28),
];

/// All known periods in chronological order
pub fn periods() -> Vec<RetrogradePeriod> {
    PERIODS
        .iter()
        .filter_map(|&(sy, sm, sd, ey, em, ed)| {
            Some(RetrogradePeriod {
                start: NaiveDate::from_ymd_opt(sy, sm, sd)?,
                end: NaiveDate::from_ymd_opt(ey, em, ed)?,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MercuryStatus {
    pub date: NaiveDate,
    pub is_retrograde: bool,
    /// Current period when retrograde, otherwise the next one
    pub period: Option<RetrogradePeriod>,
    /// Days left in the current period, when retrograde
    pub days_remaining: Option<i64>,
    /// Days until the next period starts, when direct
    pub days_until: Option<i64>,
    pub advice: String,
}

pub fn status_on(date: NaiveDate) -> MercuryStatus {
    let periods = periods();

    if let Some(current) = periods.iter().find(|p| p.contains(date)) {
        return MercuryStatus {
            date,
            is_retrograde: true,
            period: Some(*current),
            days_remaining: Some((current.end - date).num_days()),
            days_until: None,
            advice: "Double-check messages, back up your data and avoid signing \
                     contracts in a hurry."
                .to_string(),
        };
    }

    let next = periods.iter().find(|p| p.start > date).copied();
    MercuryStatus {
        date,
        is_retrograde: false,
        period: next,
        days_remaining: None,
        days_until: next.map(|p| (p.start - date).num_days()),
        advice: "Mercury is direct. A good time for communication, travel and \
                 new agreements."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_table_is_valid_and_ordered() {
        let periods = periods();
        assert_eq!(periods.len(), PERIODS.len());
        for p in &periods {
            assert!(p.start < p.end);
        }
        for pair in periods.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn test_inside_period() {
        let status = status_on(date(2025, 7, 30));
        assert!(status.is_retrograde);
        assert_eq!(status.period.unwrap().start, date(2025, 7, 18));
        assert_eq!(status.days_remaining, Some(12));
        assert_eq!(status.days_until, None);
    }

    #[test]
    fn test_period_bounds_are_inclusive() {
        assert!(status_on(date(2025, 3, 15)).is_retrograde);
        assert!(status_on(date(2025, 4, 7)).is_retrograde);
        assert!(!status_on(date(2025, 4, 8)).is_retrograde);
    }

    #[test]
    fn test_direct_reports_next_period() {
        let status = status_on(date(2025, 8, 29));
        assert!(!status.is_retrograde);
        assert_eq!(status.period.unwrap().start, date(2025, 11, 9));
        assert_eq!(status.days_until, Some(72));
        assert_eq!(status.days_remaining, None);
    }

    #[test]
    fn test_beyond_table() {
        let status = status_on(date(2030, 1, 1));
        assert!(!status.is_retrograde);
        assert!(status.period.is_none());
        assert!(status.days_until.is_none());
        assert!(status.days_remaining.is_none());
    }
}
