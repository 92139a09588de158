//! Risk groups for frailty scores
//!
//! Scores are bucketed by an ordered list of thresholds evaluated top to
//! bottom; the first threshold the score reaches decides the group.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordinal frailty risk category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrailtyGroup {
    /// No or negligible indicated risk (score below 1)
    Null = 0,
    /// Low risk (score 1 to below 5)
    Low = 1,
    /// Medium risk (score 5 to below 15)
    Medium = 2,
    /// High risk (score 15 and above)
    High = 3,
}

/// Minimum score for each group, highest first. Scores below all of them are `Null`.
pub const GROUP_THRESHOLDS: [(f64, FrailtyGroup); 3] = [
    (15.0, FrailtyGroup::High),
    (5.0, FrailtyGroup::Medium),
    (1.0, FrailtyGroup::Low),
];

impl FrailtyGroup {
    /// All groups from lowest to highest risk
    pub const ALL: [Self; 4] = [Self::Null, Self::Low, Self::Medium, Self::High];

    /// Classify a score using [`GROUP_THRESHOLDS`]
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        GROUP_THRESHOLDS
            .iter()
            .find(|(threshold, _)| score >= *threshold)
            .map_or(Self::Null, |&(_, group)| group)
    }

    /// Label written to output tables
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse an output label back into a group
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.as_str() == label)
    }
}

impl fmt::Display for FrailtyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
