//! Upcoming quarter events
//!
//! Walks a date range one day at a time and flags days whose moon age sits
//! within half a day of an exact quarter. When a quarter's window covers two
//! days in a row only the first is reported. The iterator owns nothing but
//! its cursor, so asking again for the same range replays the same events.

use chrono::NaiveDate;
use serde::Serialize;

use super::{SYNODIC_MONTH_DAYS, compute_phase_for_date};

/// Half-width of the window around each quarter boundary, in days
const EVENT_TOLERANCE_DAYS: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LunarEventType {
    NewMoon,
    FirstQuarter,
    FullMoon,
    LastQuarter,
}

impl LunarEventType {
    const BOUNDARIES: [(f64, LunarEventType); 4] = [
        (0.0, LunarEventType::NewMoon),
        (7.38, LunarEventType::FirstQuarter),
        (14.77, LunarEventType::FullMoon),
        (22.15, LunarEventType::LastQuarter),
    ];

    /// The quarter an age falls on, if any
    pub fn near(age_days: f64) -> Option<Self> {
        // Ages just below the end of the cycle are next to the new moon too
        if SYNODIC_MONTH_DAYS - age_days <= EVENT_TOLERANCE_DAYS {
            return Some(LunarEventType::NewMoon);
        }
        Self::BOUNDARIES
            .iter()
            .find(|(boundary, _)| (age_days - boundary).abs() <= EVENT_TOLERANCE_DAYS)
            .map(|(_, kind)| *kind)
    }

    pub fn label(&self) -> &'static str {
        match self {
            LunarEventType::NewMoon => "🌑 New Moon",
            LunarEventType::FirstQuarter => "🌓 First Quarter",
            LunarEventType::FullMoon => "🌕 Full Moon",
            LunarEventType::LastQuarter => "🌗 Last Quarter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LunarEvent {
    pub date: NaiveDate,
    pub event_type: LunarEventType,
    pub label: &'static str,
    pub age_days: f64,
}

/// Lazy, finite sequence of events over an inclusive day range
#[derive(Debug, Clone)]
pub struct UpcomingEvents {
    cursor: NaiveDate,
    remaining: u32,
    /// Event flagged on the previous day, if any
    previous: Option<LunarEventType>,
}

/// Events in `[from, from + days_ahead]`
pub fn upcoming_events(from: NaiveDate, days_ahead: u32) -> UpcomingEvents {
    UpcomingEvents {
        cursor: from,
        remaining: days_ahead.saturating_add(1),
        previous: None,
    }
}

impl Iterator for UpcomingEvents {
    type Item = LunarEvent;

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            let date = self.cursor;
            self.remaining -= 1;
            match date.succ_opt() {
                Some(next) => self.cursor = next,
                None => self.remaining = 0,
            }

            let moon = compute_phase_for_date(date);
            let flagged = LunarEventType::near(moon.age_days);
            let repeat = flagged.is_some() && flagged == self.previous;
            self.previous = flagged;

            if let Some(event_type) = flagged.filter(|_| !repeat) {
                return Some(LunarEvent {
                    date,
                    event_type,
                    label: event_type.label(),
                    age_days: moon.age_days,
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_events_late_summer_2025() {
        let events: Vec<_> = upcoming_events(date(2025, 8, 20), 20).collect();
        let summary: Vec<_> = events.iter().map(|e| (e.date, e.event_type)).collect();

        assert_eq!(
            summary,
            vec![
                (date(2025, 8, 23), LunarEventType::NewMoon),
                (date(2025, 8, 31), LunarEventType::FirstQuarter),
                (date(2025, 9, 7), LunarEventType::FullMoon),
            ]
        );
    }

    #[test]
    fn test_range_is_inclusive() {
        // 2025-09-15 is a last quarter day
        let events: Vec<_> = upcoming_events(date(2025, 9, 10), 5).collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].date, date(2025, 9, 15));
        assert_eq!(events[0].event_type, LunarEventType::LastQuarter);
    }

    #[test]
    fn test_zero_days_checks_only_today() {
        let events: Vec<_> = upcoming_events(date(2025, 9, 7), 0).collect();
        assert_eq!(events.len(), 1);
        assert!(upcoming_events(date(2025, 9, 8), 0).next().is_none());
    }

    #[test]
    fn test_restartable() {
        let first: Vec<_> = upcoming_events(date(2024, 1, 1), 90).collect();
        let second: Vec<_> = upcoming_events(date(2024, 1, 1), 90).collect();

        assert_eq!(first, second);
        // Roughly four events per synodic month
        assert!((10..=14).contains(&first.len()), "{}", first.len());
    }

    #[test]
    fn test_cloned_iterator_replays() {
        let iter = upcoming_events(date(2025, 8, 20), 30);
        let a: Vec<_> = iter.clone().collect();
        let b: Vec<_> = iter.collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_events_are_within_tolerance() {
        for event in upcoming_events(date(2026, 1, 1), 365) {
            let boundary = match event.event_type {
                LunarEventType::NewMoon => 0.0,
                LunarEventType::FirstQuarter => 7.38,
                LunarEventType::FullMoon => 14.77,
                LunarEventType::LastQuarter => 22.15,
            };
            let diff = (event.age_days - boundary).abs();
            let diff = diff.min((SYNODIC_MONTH_DAYS - event.age_days).abs());
            assert!(diff <= EVENT_TOLERANCE_DAYS, "{:?}", event);
        }
    }

    #[test]
    fn test_quarter_reported_once_when_window_spans_two_days() {
        // Ages 21.65 and 22.65 both sit on the last quarter window
        let events: Vec<_> = upcoming_events(date(2026, 10, 1), 5).collect();
        let last_quarters: Vec<_> = events
            .iter()
            .filter(|e| e.event_type == LunarEventType::LastQuarter)
            .collect();

        assert_eq!(last_quarters.len(), 1, "{:?}", events);
        assert!(last_quarters[0].date <= date(2026, 10, 4));
    }

    #[test]
    fn test_no_event_repeats_on_adjacent_days() {
        let events: Vec<_> = upcoming_events(date(2024, 1, 1), 4 * 366).collect();
        for pair in events.windows(2) {
            let adjacent = pair[0].date.succ_opt() == Some(pair[1].date);
            assert!(
                !(adjacent && pair[0].event_type == pair[1].event_type),
                "{:?}",
                pair
            );
        }
    }

    #[test]
    fn test_near_wraps_at_cycle_end() {
        assert_eq!(LunarEventType::near(29.3), Some(LunarEventType::NewMoon));
        assert_eq!(LunarEventType::near(0.4), Some(LunarEventType::NewMoon));
        assert_eq!(LunarEventType::near(3.0), None);
        assert_eq!(LunarEventType::near(14.5), Some(LunarEventType::FullMoon));
    }
}
