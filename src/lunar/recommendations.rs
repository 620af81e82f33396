//! Advisory tags per moon phase

use serde::Serialize;

use super::MoonPhase;

/// What the phase favors and what it does not
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendations {
    pub favorable: Vec<&'static str>,
    pub unfavorable: Vec<&'static str>,
    pub energy_label: &'static str,
}

struct Entry {
    phase: MoonPhase,
    energy_label: &'static str,
    favorable: &'static [&'static str],
    unfavorable: &'static [&'static str],
}

impl Entry {
    fn to_recommendations(&self) -> Recommendations {
        Recommendations {
            favorable: self.favorable.to_vec(),
            unfavorable: self.unfavorable.to_vec(),
            energy_label: self.energy_label,
        }
    }
}

const NEW_MOON: Entry = Entry {
    phase: MoonPhase::New,
    energy_label: "Renewal",
    favorable: &[
        "Setting intentions",
        "Planning new projects",
        "Rest and reflection",
        "Starting a detox",
    ],
    unfavorable: &[
        "Major launches",
        "Surgery",
        "Signing contracts",
    ],
};

static TABLE: [Entry; 8] = [
    NEW_MOON,
    Entry {
        phase: MoonPhase::WaxingCrescent,
        energy_label: "Growth",
        favorable: &[
            "Taking first steps",
            "Learning something new",
            "Networking",
            "Planting",
        ],
        unfavorable: &["Ending relationships", "Heavy decluttering"],
    },
    Entry {
        phase: MoonPhase::FirstQuarter,
        energy_label: "Action",
        favorable: &[
            "Making decisions",
            "Overcoming obstacles",
            "Physical training",
            "Negotiations",
        ],
        unfavorable: &["Procrastination", "Avoiding conflict"],
    },
    Entry {
        phase: MoonPhase::WaxingGibbous,
        energy_label: "Refinement",
        favorable: &[
            "Polishing work in progress",
            "Editing and reviewing",
            "Patience with others",
        ],
        unfavorable: &["Starting from scratch", "Impulsive purchases"],
    },
    Entry {
        phase: MoonPhase::Full,
        energy_label: "Culmination",
        favorable: &[
            "Celebrations",
            "Completing projects",
            "Gratitude practice",
            "Creative work",
        ],
        unfavorable: &[
            "Arguments",
            "Important medical procedures",
            "Overeating",
        ],
    },
    Entry {
        phase: MoonPhase::WaningGibbous,
        energy_label: "Sharing",
        favorable: &[
            "Teaching and mentoring",
            "Giving feedback",
            "Donating",
        ],
        unfavorable: &["Hoarding", "Taking on new debt"],
    },
    Entry {
        phase: MoonPhase::LastQuarter,
        energy_label: "Release",
        favorable: &[
            "Decluttering",
            "Breaking bad habits",
            "Forgiveness",
            "Finishing old tasks",
        ],
        unfavorable: &["New commitments", "Big investments"],
    },
    Entry {
        phase: MoonPhase::WaningCrescent,
        energy_label: "Surrender",
        favorable: &["Meditation", "Sleep and recovery", "Journaling"],
        unfavorable: &[
            "Strenuous exercise",
            "Launching projects",
            "Important meetings",
        ],
    },
];

/// Advisory mapping for a phase
pub fn recommendations_for(phase: MoonPhase) -> Recommendations {
    lookup(&TABLE, phase)
}

/// Falls back to the new-moon mapping when the table lacks the phase
fn lookup(table: &[Entry], phase: MoonPhase) -> Recommendations {
    table
        .iter()
        .find(|entry| entry.phase == phase)
        .unwrap_or(&NEW_MOON)
        .to_recommendations()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_phase_has_a_mapping() {
        for phase in MoonPhase::ALL {
            let recs = recommendations_for(phase);
            assert!(!recs.favorable.is_empty(), "{:?}", phase);
            assert!(!recs.unfavorable.is_empty(), "{:?}", phase);
            assert!(!recs.energy_label.is_empty(), "{:?}", phase);
        }
    }

    #[test]
    fn test_table_has_one_entry_per_phase() {
        for phase in MoonPhase::ALL {
            let count = TABLE.iter().filter(|e| e.phase == phase).count();
            assert_eq!(count, 1, "{:?}", phase);
        }
    }

    #[test]
    fn test_full_moon_mapping() {
        let recs = recommendations_for(MoonPhase::Full);
        assert_eq!(recs.energy_label, "Culmination");
        assert!(recs.favorable.contains(&"Celebrations"));
    }

    #[test]
    fn test_missing_phase_falls_back_to_new_moon() {
        let recs = lookup(&TABLE[..3], MoonPhase::Full);

        assert_eq!(recs, recommendations_for(MoonPhase::New));
        assert_eq!(recs.energy_label, "Renewal");
    }
}
