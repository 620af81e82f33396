//! Numerology display models

use serde::Serialize;
use tabled::Tabled;

use crate::numerology::{NumerologyProfile, meaning};

/// One number of a profile, for table output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct NumberDisplay {
    #[tabled(rename = "NUMBER")]
    pub name: &'static str,

    #[tabled(rename = "VALUE")]
    pub value: u8,

    #[tabled(rename = "MEANING")]
    pub meaning: &'static str,
}

impl NumberDisplay {
    fn new(name: &'static str, value: u8) -> Self {
        Self {
            name,
            value,
            meaning: meaning(value),
        }
    }

    /// The five numbers of a profile, life path first
    pub fn rows(profile: &NumerologyProfile) -> Vec<Self> {
        vec![
            Self::new("Life path", profile.life_path),
            Self::new("Destiny", profile.destiny),
            Self::new("Personality", profile.personality),
            Self::new("Soul", profile.soul),
            Self::new("Achievement", profile.achievement),
        ]
    }
}

/// `numerology --compare` result
#[derive(Debug, Clone, Serialize)]
pub struct CompatibilityReport {
    pub first: NumerologyProfile,
    pub second: NumerologyProfile,
    /// Life path compatibility, 40-100
    pub compatibility_percent: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerology::profile;
    use chrono::NaiveDate;

    #[test]
    fn test_rows_follow_profile() {
        let p = profile(NaiveDate::from_ymd_opt(1990, 5, 15).unwrap());
        let rows = NumberDisplay::rows(&p);

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].name, "Life path");
        assert_eq!(rows[0].value, 3);
        assert_eq!(rows[0].meaning, "Expression");
        assert_eq!(rows[3].value, 11);
    }
}
