//! Reference table of Hospital Frailty Risk Score diagnosis fragments
//!
//! Each entry pairs a three-character ICD-10 prefix with the weight it
//! contributes to the frailty score when found anywhere in a record's
//! diagnosis text.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::error::{ConfigurationError, Result};

/// A diagnosis fragment and the weight it contributes when matched
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodeWeight {
    /// Literal substring searched for in the diagnosis text
    pub fragment: &'static str,
    /// Weight added to the score when the fragment is present
    pub weight: f64,
}

impl CodeWeight {
    /// Create a new entry
    #[must_use]
    pub const fn new(fragment: &'static str, weight: f64) -> Self {
        Self { fragment, weight }
    }

    /// Weight as a whole number of tenths
    #[must_use]
    pub fn tenths(&self) -> i64 {
        weight_tenths(self.weight)
    }
}

/// Weights are published to one decimal place
const TENTHS_PER_UNIT: f64 = 10.0;

#[allow(clippy::cast_possible_truncation)]
fn weight_tenths(weight: f64) -> i64 {
    (weight * TENTHS_PER_UNIT).round() as i64
}

/// Add up weights as integer tenths, converting once at the end
///
/// `2.4 + 2.3 + 0.3` comes out exactly `5.0`, not `4.999...`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sum_weights<I>(weights: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    weights.into_iter().map(weight_tenths).sum::<i64>() as f64 / TENTHS_PER_UNIT
}

/// The Hospital Frailty Risk Score reference entries, highest weight first
pub const HFRS_CODE_WEIGHTS: [CodeWeight; 109] = [
    CodeWeight::new("F00", 7.1),
    CodeWeight::new("G81", 4.4),
    CodeWeight::new("G30", 4.0),
    CodeWeight::new("I69", 3.7),
    CodeWeight::new("R29", 3.6),
    CodeWeight::new("N39", 3.2),
    CodeWeight::new("F05", 3.2),
    CodeWeight::new("W19", 3.2),
    CodeWeight::new("S00", 3.2),
    CodeWeight::new("R31", 3.0),
    CodeWeight::new("B96", 2.9),
    CodeWeight::new("R41", 2.7),
    CodeWeight::new("R26", 2.6),
    CodeWeight::new("I67", 2.6),
    CodeWeight::new("R56", 2.6),
    CodeWeight::new("R40", 2.5),
    CodeWeight::new("T83", 2.4),
    CodeWeight::new("S06", 2.4),
    CodeWeight::new("S42", 2.3),
    CodeWeight::new("E87", 2.3),
    CodeWeight::new("M25", 2.3),
    CodeWeight::new("E86", 2.3),
    CodeWeight::new("R54", 2.2),
    CodeWeight::new("Z50", 2.1),
    CodeWeight::new("F03", 2.1),
    CodeWeight::new("W18", 2.1),
    CodeWeight::new("Z75", 2.0),
    CodeWeight::new("F01", 2.0),
    CodeWeight::new("S80", 2.0),
    CodeWeight::new("L03", 2.0),
    CodeWeight::new("H54", 1.9),
    CodeWeight::new("E53", 1.9),
    CodeWeight::new("Z60", 1.8),
    CodeWeight::new("G20", 1.8),
    CodeWeight::new("R55", 1.8),
    CodeWeight::new("S22", 1.8),
    CodeWeight::new("K59", 1.8),
    CodeWeight::new("N17", 1.8),
    CodeWeight::new("L89", 1.7),
    CodeWeight::new("Z22", 1.7),
    CodeWeight::new("B95", 1.7),
    CodeWeight::new("L97", 1.6),
    CodeWeight::new("R44", 1.6),
    CodeWeight::new("K26", 1.6),
    CodeWeight::new("I95", 1.6),
    CodeWeight::new("N19", 1.6),
    CodeWeight::new("A41", 1.6),
    CodeWeight::new("Z87", 1.5),
    CodeWeight::new("J96", 1.5),
    CodeWeight::new("X59", 1.5),
    CodeWeight::new("M19", 1.5),
    CodeWeight::new("G40", 1.5),
    CodeWeight::new("M81", 1.4),
    CodeWeight::new("S72", 1.4),
    CodeWeight::new("S32", 1.4),
    CodeWeight::new("E16", 1.4),
    CodeWeight::new("R94", 1.4),
    CodeWeight::new("N18", 1.4),
    CodeWeight::new("R33", 1.3),
    CodeWeight::new("R69", 1.3),
    CodeWeight::new("N28", 1.3),
    CodeWeight::new("R32", 1.2),
    CodeWeight::new("G31", 1.2),
    CodeWeight::new("Y95", 1.2),
    CodeWeight::new("S09", 1.2),
    CodeWeight::new("R45", 1.2),
    CodeWeight::new("G45", 1.2),
    CodeWeight::new("Z74", 1.1),
    CodeWeight::new("M79", 1.1),
    CodeWeight::new("W06", 1.1),
    CodeWeight::new("S01", 1.1),
    CodeWeight::new("A04", 1.1),
    CodeWeight::new("A09", 1.1),
    CodeWeight::new("J18", 1.1),
    CodeWeight::new("J69", 1.0),
    CodeWeight::new("R47", 1.0),
    CodeWeight::new("E55", 1.0),
    CodeWeight::new("Z93", 1.0),
    CodeWeight::new("R02", 1.0),
    CodeWeight::new("R63", 0.9),
    CodeWeight::new("H91", 0.9),
    CodeWeight::new("W10", 0.9),
    CodeWeight::new("W01", 0.9),
    CodeWeight::new("E05", 0.9),
    CodeWeight::new("M41", 0.9),
    CodeWeight::new("R13", 0.8),
    CodeWeight::new("Z99", 0.8),
    CodeWeight::new("U80", 0.8),
    CodeWeight::new("M80", 0.8),
    CodeWeight::new("K92", 0.8),
    CodeWeight::new("I63", 0.8),
    CodeWeight::new("N20", 0.7),
    CodeWeight::new("F10", 0.7),
    CodeWeight::new("Y84", 0.7),
    CodeWeight::new("R00", 0.7),
    CodeWeight::new("J22", 0.7),
    CodeWeight::new("Z73", 0.6),
    CodeWeight::new("R79", 0.6),
    CodeWeight::new("Z91", 0.5),
    CodeWeight::new("S51", 0.5),
    CodeWeight::new("F32", 0.5),
    CodeWeight::new("M48", 0.5),
    CodeWeight::new("E83", 0.4),
    CodeWeight::new("M15", 0.4),
    CodeWeight::new("D64", 0.4),
    CodeWeight::new("L08", 0.4),
    CodeWeight::new("R11", 0.3),
    CodeWeight::new("K52", 0.3),
    CodeWeight::new("R50", 0.1),
];

static HFRS_TABLE: LazyLock<ReferenceTable> = LazyLock::new(|| {
    let table = ReferenceTable::collapse(&HFRS_CODE_WEIGHTS);
    for shadowed in table.shadowed() {
        log::warn!(
            "Reference fragment {} listed more than once, weight {} is overridden",
            shadowed.fragment,
            shadowed.weight
        );
    }
    table
});

/// Ordered, read-only lookup of fragment weights
///
/// Entries keep the position of the first occurrence of their fragment. When
/// a fragment is listed again, the later weight replaces the earlier one and
/// the replaced entry is kept in [`ReferenceTable::shadowed`].
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    entries: Vec<CodeWeight>,
    index: FxHashMap<&'static str, usize>,
    shadowed: Vec<CodeWeight>,
}

impl ReferenceTable {
    /// The process-wide Hospital Frailty Risk Score table
    #[must_use]
    pub fn hfrs() -> &'static Self {
        &HFRS_TABLE
    }

    /// Build a table from custom entries
    ///
    /// # Errors
    /// Returns a configuration error if a fragment is empty or a weight is
    /// not a positive finite number.
    pub fn from_entries(entries: &[CodeWeight]) -> Result<Self> {
        for entry in entries {
            let reason = if entry.fragment.is_empty() {
                Some("fragment is empty")
            } else if !entry.weight.is_finite() || entry.weight <= 0.0 {
                Some("weight must be a positive number")
            } else if (entry.weight * TENTHS_PER_UNIT - entry.tenths() as f64).abs() > 1e-6 {
                Some("weight must be a whole number of tenths")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(ConfigurationError::InvalidReferenceEntry {
                    fragment: entry.fragment.to_string(),
                    reason: reason.to_string(),
                }
                .into());
            }
        }
        Ok(Self::collapse(entries))
    }

    fn collapse(entries: &[CodeWeight]) -> Self {
        let mut table = Self {
            entries: Vec::with_capacity(entries.len()),
            index: FxHashMap::default(),
            shadowed: Vec::new(),
        };

        for entry in entries {
            if let Some(&position) = table.index.get(entry.fragment) {
                table.shadowed.push(table.entries[position]);
                table.entries[position].weight = entry.weight;
            } else {
                table.index.insert(entry.fragment, table.entries.len());
                table.entries.push(*entry);
            }
        }

        table
    }

    /// Number of distinct fragments
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no fragments
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Effective entries in table order
    #[must_use]
    pub fn entries(&self) -> &[CodeWeight] {
        &self.entries
    }

    /// Entries whose weight was replaced by a later duplicate
    #[must_use]
    pub fn shadowed(&self) -> &[CodeWeight] {
        &self.shadowed
    }

    /// Effective weight of a fragment
    #[must_use]
    pub fn weight(&self, fragment: &str) -> Option<f64> {
        self.position(fragment).map(|idx| self.entries[idx].weight)
    }

    /// Position of a fragment in table order
    #[must_use]
    pub fn position(&self, fragment: &str) -> Option<usize> {
        self.index.get(fragment).copied()
    }

    /// Indicator column names, one per fragment in table order
    #[must_use]
    pub fn column_names(&self, prefix: &str) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| format!("{prefix}{}", entry.fragment))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hfrs_table_shape() {
        let table = ReferenceTable::hfrs();
        assert_eq!(table.len(), 109);
        assert!(table.shadowed().is_empty());
        assert!(table.entries().iter().all(|e| e.fragment.len() == 3));
        assert!(
            table
                .entries()
                .iter()
                .all(|e| (0.1..=7.1).contains(&e.weight))
        );
    }

    #[test]
    fn test_hfrs_known_weights() {
        let table = ReferenceTable::hfrs();
        assert_eq!(table.weight("F00"), Some(7.1));
        assert_eq!(table.weight("T83"), Some(2.4));
        assert_eq!(table.weight("R50"), Some(0.1));
        assert_eq!(table.weight("Z96"), None);
        assert_eq!(table.position("F00"), Some(0));
    }

    #[test]
    fn test_duplicates_collapse_last_write_wins() {
        let table = ReferenceTable::from_entries(&[
            CodeWeight::new("A01", 1.0),
            CodeWeight::new("B02", 2.0),
            CodeWeight::new("A01", 3.0),
        ])
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.position("A01"), Some(0));
        assert_eq!(table.weight("A01"), Some(3.0));
        assert_eq!(table.shadowed(), &[CodeWeight::new("A01", 1.0)]);
    }

    #[test]
    fn test_invalid_entries_rejected() {
        let empty = ReferenceTable::from_entries(&[CodeWeight::new("", 1.0)]);
        assert!(empty.unwrap_err().is_configuration());

        let negative = ReferenceTable::from_entries(&[CodeWeight::new("A01", -1.0)]);
        assert!(negative.unwrap_err().is_configuration());

        let nan = ReferenceTable::from_entries(&[CodeWeight::new("A01", f64::NAN)]);
        assert!(nan.is_err());

        let hundredths = ReferenceTable::from_entries(&[CodeWeight::new("A01", 0.25)]);
        assert!(hundredths.unwrap_err().is_configuration());
    }

    #[test]
    fn test_sum_weights_is_exact() {
        assert_eq!(sum_weights([2.4, 2.3, 0.3]), 5.0);
        assert_eq!(sum_weights([7.1, 4.4, 3.5]), 15.0);
        assert_eq!(sum_weights([]), 0.0);
        assert!(HFRS_CODE_WEIGHTS.iter().all(|e| e.tenths() > 0));
    }

    #[test]
    fn test_column_names() {
        let table = ReferenceTable::hfrs();
        let names = table.column_names("icd_");
        assert_eq!(names.len(), 109);
        assert_eq!(names[0], "icd_F00");
        assert_eq!(names[108], "icd_R50");
    }
}
