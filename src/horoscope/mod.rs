//! Daily horoscopes from a remote service, cached, with offline fallback

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod client;
#[cfg(test)]
pub mod mock;
pub mod offline;
pub mod service;

pub use client::HoroscopeClient;
#[cfg(test)]
pub use mock::MockHoroscopeClient;
pub use service::HoroscopeService;

/// Remote horoscope source.
///
/// One attempt per call; callers decide what to do on failure.
#[async_trait]
pub trait HoroscopeApi: Send + Sync {
    /// Daily horoscope text for `sign` on `date`
    async fn fetch_daily(&self, sign: ZodiacSign, date: NaiveDate) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "♈",
            ZodiacSign::Taurus => "♉",
            ZodiacSign::Gemini => "♊",
            ZodiacSign::Cancer => "♋",
            ZodiacSign::Leo => "♌",
            ZodiacSign::Virgo => "♍",
            ZodiacSign::Libra => "♎",
            ZodiacSign::Scorpio => "♏",
            ZodiacSign::Sagittarius => "♐",
            ZodiacSign::Capricorn => "♑",
            ZodiacSign::Aquarius => "♒",
            ZodiacSign::Pisces => "♓",
        }
    }

    pub fn element(&self) -> Element {
        match self {
            ZodiacSign::Aries | ZodiacSign::Leo | ZodiacSign::Sagittarius => Element::Fire,
            ZodiacSign::Taurus | ZodiacSign::Virgo | ZodiacSign::Capricorn => Element::Earth,
            ZodiacSign::Gemini | ZodiacSign::Libra | ZodiacSign::Aquarius => Element::Air,
            ZodiacSign::Cancer | ZodiacSign::Scorpio | ZodiacSign::Pisces => Element::Water,
        }
    }

    /// Sun sign for a birth date (tropical, conventional cusp days)
    pub fn for_date(date: NaiveDate) -> Self {
        // First day of each sign, starting with Capricorn's January tail
        const CUSPS: [(u32, u32, ZodiacSign); 12] = [
            (1, 20, ZodiacSign::Aquarius),
            (2, 19, ZodiacSign::Pisces),
            (3, 21, ZodiacSign::Aries),
            (4, 20, ZodiacSign::Taurus),
            (5, 21, ZodiacSign::Gemini),
            (6, 21, ZodiacSign::Cancer),
            (7, 23, ZodiacSign::Leo),
            (8, 23, ZodiacSign::Virgo),
            (9, 23, ZodiacSign::Libra),
            (10, 23, ZodiacSign::Scorpio),
            (11, 22, ZodiacSign::Sagittarius),
            (12, 22, ZodiacSign::Capricorn),
        ];

        let md = (date.month(), date.day());
        CUSPS
            .iter()
            .rev()
            .find(|(m, d, _)| md >= (*m, *d))
            .map(|(_, _, sign)| *sign)
            .unwrap_or(ZodiacSign::Capricorn)
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ZodiacSign {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        ZodiacSign::ALL
            .into_iter()
            .find(|sign| sign.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidInput(format!("'{}' is not a zodiac sign", s)))
    }
}

/// Where a horoscope text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoroscopeSource {
    /// Fetched from the remote service just now
    Live,
    /// Served from the local cache
    Cached,
    /// Generated locally because the remote service failed
    Offline,
}

impl HoroscopeSource {
    pub fn label(&self) -> &'static str {
        match self {
            HoroscopeSource::Live => "live",
            HoroscopeSource::Cached => "cached",
            HoroscopeSource::Offline => "offline",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horoscope {
    pub sign: ZodiacSign,
    pub date: NaiveDate,
    pub text: String,
    pub source: HoroscopeSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sign_from_str_is_case_insensitive() {
        assert_eq!("aries".parse::<ZodiacSign>().unwrap(), ZodiacSign::Aries);
        assert_eq!(" SCORPIO ".parse::<ZodiacSign>().unwrap(), ZodiacSign::Scorpio);
        assert!(matches!(
            "ophiuchus".parse::<ZodiacSign>(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_sign_for_date_cusps() {
        assert_eq!(ZodiacSign::for_date(date(1990, 1, 1)), ZodiacSign::Capricorn);
        assert_eq!(ZodiacSign::for_date(date(1990, 1, 19)), ZodiacSign::Capricorn);
        assert_eq!(ZodiacSign::for_date(date(1990, 1, 20)), ZodiacSign::Aquarius);
        assert_eq!(ZodiacSign::for_date(date(1990, 3, 21)), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::for_date(date(1990, 5, 15)), ZodiacSign::Taurus);
        assert_eq!(ZodiacSign::for_date(date(1990, 12, 31)), ZodiacSign::Capricorn);
    }

    #[test]
    fn test_elements_are_balanced() {
        for element in [Element::Fire, Element::Earth, Element::Air, Element::Water] {
            let count = ZodiacSign::ALL
                .iter()
                .filter(|s| s.element() == element)
                .count();
            assert_eq!(count, 3);
        }
    }

    #[test]
    fn test_horoscope_serde_shape() {
        let h = Horoscope {
            sign: ZodiacSign::Leo,
            date: date(2025, 8, 29),
            text: "Shine.".to_string(),
            source: HoroscopeSource::Cached,
        };
        let json = serde_json::to_string(&h).unwrap();
        assert!(json.contains("\"sign\":\"leo\""));
        assert!(json.contains("\"source\":\"cached\""));
    }
}
