//! Numerology reductions from a birth date
//!
//! Every number is a repeated decimal digit sum that stops at a single digit
//! or at one of the master numbers 11, 22 and 33.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Numbers that are never reduced further
pub const MASTER_NUMBERS: [u32; 3] = [11, 22, 33];

pub fn is_master(n: u32) -> bool {
    MASTER_NUMBERS.contains(&n)
}

pub fn digit_sum(mut n: u32) -> u32 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

/// Every value visited while reducing `n`, starting with `n` itself
pub fn reduction_chain(n: u32) -> Vec<u32> {
    let mut chain = vec![n];
    let mut current = n;
    while current > 9 && !is_master(current) {
        current = digit_sum(current);
        chain.push(current);
    }
    chain
}

/// Reduce to 1-9, or a master number. `reduce(0)` is 0.
pub fn reduce(n: u32) -> u8 {
    reduction_chain(n).last().copied().unwrap_or(0) as u8
}

/// Parse a birth date given as ISO `YYYY-MM-DD`
pub fn parse_birth_date(input: &str) -> Result<NaiveDate> {
    crate::lunar::parse_date(input)
}

/// Step-by-step life path reduction, kept for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifePathSteps {
    pub day: Vec<u32>,
    pub month: Vec<u32>,
    pub year: Vec<u32>,
    /// Reduction of the sum of the three reduced parts
    pub total: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumerologyProfile {
    pub birth_date: NaiveDate,
    pub life_path: u8,
    pub destiny: u8,
    pub personality: u8,
    pub soul: u8,
    pub achievement: u8,
    /// Display percentage, 60-99
    pub strength: u8,
    pub life_path_steps: LifePathSteps,
}

/// Compute all five numbers for a birth date
pub fn profile(birth_date: NaiveDate) -> NumerologyProfile {
    let day = birth_date.day();
    let month = birth_date.month();
    let year = birth_date.year().unsigned_abs();

    let day_chain = reduction_chain(day);
    let month_chain = reduction_chain(month);
    let year_chain = reduction_chain(year);
    let parts_sum: u32 = [&day_chain, &month_chain, &year_chain]
        .iter()
        .map(|chain| chain.last().copied().unwrap_or(0))
        .sum();
    let total_chain = reduction_chain(parts_sum);

    let life_path = total_chain.last().copied().unwrap_or(0) as u8;
    let destiny = reduce(digit_sum(year) + digit_sum(month) + digit_sum(day));
    let personality = reduce(day);
    let soul = reduce(reduce(month) as u32 + reduce(day) as u32);
    let achievement = reduce(life_path as u32 + personality as u32);

    let total: u32 = [life_path, destiny, personality, soul, achievement]
        .iter()
        .map(|n| *n as u32)
        .sum();
    let strength = 60 + ((total * 7) % 40) as u8;

    NumerologyProfile {
        birth_date,
        life_path,
        destiny,
        personality,
        soul,
        achievement,
        strength,
        life_path_steps: LifePathSteps {
            day: day_chain,
            month: month_chain,
            year: year_chain,
            total: total_chain,
        },
    }
}

/// Life path compatibility percentage, 40-100.
///
/// Master numbers are compared by their single-digit root.
pub fn compatibility(a: u8, b: u8) -> u8 {
    let root = |n: u8| if is_master(n as u32) { digit_sum(n as u32) } else { n as u32 };
    let distance = root(a).abs_diff(root(b));
    100u32.saturating_sub(distance * 12).max(40) as u8
}

/// Short keyword for a reduced number
pub fn meaning(n: u8) -> &'static str {
    match n {
        1 => "Leadership",
        2 => "Partnership",
        3 => "Expression",
        4 => "Stability",
        5 => "Freedom",
        6 => "Care",
        7 => "Insight",
        8 => "Ambition",
        9 => "Compassion",
        11 => "Intuition (master)",
        22 => "Master builder",
        33 => "Master teacher",
        _ => "Unknown",
    }
}
