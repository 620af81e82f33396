//! Locally generated horoscope text for when the remote service is down
//!
//! Phrase choice is seeded by a SHA-256 of sign and date, so the same day
//! always reads the same for a given sign.

use chrono::NaiveDate;
use sha2::{Digest, Sha256};

use super::{Element, ZodiacSign};

const OPENINGS_FIRE: &[&str] = &[
    "Your inner fire burns bright today.",
    "Bold energy surrounds you.",
    "A spark of inspiration arrives early.",
];

const OPENINGS_EARTH: &[&str] = &[
    "Steady progress is on your side today.",
    "Practical matters fall into place.",
    "Your patience is about to pay off.",
];

const OPENINGS_AIR: &[&str] = &[
    "New ideas are in the air today.",
    "Conversations open unexpected doors.",
    "Your curiosity leads somewhere useful.",
];

const OPENINGS_WATER: &[&str] = &[
    "Trust your intuition today.",
    "Emotional clarity comes in quiet moments.",
    "A gentle tide carries you forward.",
];

const FOCUS: &[&str] = &[
    "Focus on finishing what you started.",
    "Relationships deserve extra attention.",
    "Money matters benefit from careful review.",
    "Your health responds well to small changes.",
    "Creative projects are especially favored.",
    "A short trip or a change of scene helps.",
];

const ADVICE: &[&str] = &[
    "Avoid rushing important decisions.",
    "Say yes to a helping hand.",
    "Take a moment to rest before evening.",
    "Write down the idea that keeps returning.",
    "Let go of a small grudge.",
];

/// Deterministic, non-empty horoscope text for `sign` on `date`
pub fn offline_text(sign: ZodiacSign, date: NaiveDate) -> String {
    let digest = Sha256::digest(format!("{}|{}", sign.name(), date).as_bytes());

    let openings = match sign.element() {
        Element::Fire => OPENINGS_FIRE,
        Element::Earth => OPENINGS_EARTH,
        Element::Air => OPENINGS_AIR,
        Element::Water => OPENINGS_WATER,
    };

    let pick = |list: &[&'static str], byte: u8| list[byte as usize % list.len()];
    let lucky_number = digest[3] % 9 + 1;

    format!(
        "{} {} {} Lucky number: {}.",
        pick(openings, digest[0]),
        pick(FOCUS, digest[1]),
        pick(ADVICE, digest[2]),
        lucky_number
    )
}
