//! Cache key layout
//!
//! Stored keys are `<namespace>_<logicalName>`. Logical names are built here
//! so every call site agrees on them.

use chrono::NaiveDate;

/// Prefix shared by every key in `namespace`
pub fn namespace_prefix(namespace: &str) -> String {
    format!("{}_", namespace)
}

/// Full stored key for a logical name
pub fn namespaced_key(namespace: &str, logical: &str) -> String {
    format!("{}_{}", namespace, logical)
}

/// `moon_<date>[_<lat>_<lon>]`
pub fn moon_key(date: NaiveDate, observer: Option<(f64, f64)>) -> String {
    match observer {
        Some((lat, lon)) => format!("moon_{}_{:.2}_{:.2}", date, lat, lon),
        None => format!("moon_{}", date),
    }
}

/// `horoscope_<sign>_<date>`
pub fn horoscope_key(sign: &str, date: NaiveDate) -> String {
    format!("horoscope_{}_{}", sign.to_lowercase(), date)
}

/// `mercury_<date>`
pub fn mercury_key(date: NaiveDate) -> String {
    format!("mercury_{}", date)
}

/// `numerology_<birth date>`
pub fn numerology_key(birth_date: NaiveDate) -> String {
    format!("numerology_{}", birth_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_namespaced_key_layout() {
        assert_eq!(namespaced_key("astrokit", "moon_data"), "astrokit_moon_data");
        assert!(namespaced_key("astrokit", "x").starts_with(&namespace_prefix("astrokit")));
    }

    #[test]
    fn test_moon_key_with_and_without_observer() {
        let d = date(2025, 8, 29);
        assert_eq!(moon_key(d, None), "moon_2025-08-29");
        assert_eq!(moon_key(d, Some((55.751, 37.618))), "moon_2025-08-29_55.75_37.62");
    }

    #[test]
    fn test_horoscope_key_is_case_insensitive() {
        let d = date(2025, 8, 29);
        assert_eq!(horoscope_key("Aries", d), horoscope_key("aries", d));
        assert_eq!(horoscope_key("Aries", d), "horoscope_aries_2025-08-29");
    }

    #[test]
    fn test_keys_differ_by_date() {
        assert_ne!(mercury_key(date(2025, 1, 1)), mercury_key(date(2025, 1, 2)));
        assert_ne!(
            numerology_key(date(1990, 5, 15)),
            numerology_key(date(1990, 5, 16))
        );
    }
}
