//! Horoscope display model

use serde::Serialize;
use tabled::Tabled;

use super::common::truncate_string;
use crate::horoscope::Horoscope;

/// Longest horoscope text shown in a table cell
const TEXT_COLUMN_WIDTH: usize = 72;

/// Horoscope row for `horoscope --all` tables.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct HoroscopeDisplay {
    #[tabled(rename = "SIGN")]
    pub sign: String,

    #[tabled(rename = "SOURCE")]
    pub source: &'static str,

    #[tabled(rename = "HOROSCOPE")]
    pub text: String,
}

impl From<Horoscope> for HoroscopeDisplay {
    fn from(h: Horoscope) -> Self {
        Self {
            sign: format!("{} {}", h.sign.symbol(), h.sign),
            source: h.source.label(),
            text: truncate_string(&h.text, TEXT_COLUMN_WIDTH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::horoscope::{HoroscopeSource, ZodiacSign};
    use chrono::NaiveDate;

    #[test]
    fn test_horoscope_display_from_horoscope() {
        let h = Horoscope {
            sign: ZodiacSign::Aries,
            date: NaiveDate::from_ymd_opt(2025, 8, 29).unwrap(),
            text: "x".repeat(200),
            source: HoroscopeSource::Offline,
        };

        let display = HoroscopeDisplay::from(h);

        assert_eq!(display.sign, "♈ Aries");
        assert_eq!(display.source, "offline");
        assert_eq!(display.text.chars().count(), TEXT_COLUMN_WIDTH);
    }
}
