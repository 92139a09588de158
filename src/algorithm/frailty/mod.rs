//! Hospital Frailty Risk Score algorithm
//!
//! Scores a record by searching its free-text diagnosis field for every
//! fragment of the reference table. Each fragment found contributes its
//! weight once, the weights are summed, and the sum is bucketed into a
//! [`FrailtyGroup`].
//!
//! Matching is plain case-sensitive substring containment: "F00" matches
//! "F001", "F00|G81" and "XF00Y" alike. Delimiters in the text are
//! irrelevant, and missing text matches nothing.

pub mod codes;
pub mod group;
pub mod report;

use arrow::record_batch::RecordBatch;
use indicatif::ProgressBar;
use rayon::prelude::*;
use smallvec::SmallVec;

use crate::adapters::{ColumnLayout, ScoreTarget};
use crate::config::FrailtyConfig;
use crate::error::Result;
use codes::{ReferenceTable, sum_weights};
use group::FrailtyGroup;

/// Scoring result for a single record
#[derive(Debug, Clone, PartialEq)]
pub struct FrailtyScore {
    /// One value per reference fragment, in table order: the weight if matched, else 0
    pub indicators: Vec<f64>,
    /// Table positions of the matched fragments
    pub matched: SmallVec<[usize; 8]>,
    /// Sum of all indicators, added in exact tenths
    pub score: f64,
    /// Risk group derived from `score`
    pub group: FrailtyGroup,
}

impl FrailtyScore {
    /// Whether any fragment matched
    #[must_use]
    pub fn has_matches(&self) -> bool {
        !self.matched.is_empty()
    }
}

/// Scores diagnosis text against a reference table
#[derive(Debug, Clone)]
pub struct FrailtyScorer<'t> {
    table: &'t ReferenceTable,
    layout: ColumnLayout,
    parallel: bool,
}

impl FrailtyScorer<'static> {
    /// Scorer over the HFRS table with default column names
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&FrailtyConfig::default())
    }

    /// Scorer over the HFRS table using the given configuration
    #[must_use]
    pub fn from_config(config: &FrailtyConfig) -> Self {
        Self::with_table(ReferenceTable::hfrs(), config)
    }
}

impl Default for FrailtyScorer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'t> FrailtyScorer<'t> {
    /// Scorer over a custom reference table
    #[must_use]
    pub fn with_table(table: &'t ReferenceTable, config: &FrailtyConfig) -> Self {
        Self {
            table,
            layout: ColumnLayout::new(table, config),
            parallel: config.parallel,
        }
    }

    /// The reference table in use
    #[must_use]
    pub const fn table(&self) -> &'t ReferenceTable {
        self.table
    }

    /// Names of the columns this scorer adds
    #[must_use]
    pub const fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Score one diagnosis text. `None` is scored as matching nothing.
    #[must_use]
    pub fn score_text(&self, text: Option<&str>) -> FrailtyScore {
        let entries = self.table.entries();
        let mut indicators = vec![0.0; entries.len()];
        let mut matched = SmallVec::new();

        if let Some(text) = text.filter(|t| !t.is_empty()) {
            for (idx, entry) in entries.iter().enumerate() {
                if text.contains(entry.fragment) {
                    indicators[idx] = entry.weight;
                    matched.push(idx);
                }
            }
        }

        let score = sum_weights(indicators.iter().copied());
        FrailtyScore {
            indicators,
            matched,
            score,
            group: FrailtyGroup::from_score(score),
        }
    }

    /// Score every row of a table, returning the table with the frailty columns added
    ///
    /// The diagnosis field and the output column names are validated before
    /// any row is scored.
    pub fn score<T>(&self, target: &T, field: &str) -> Result<T::Output>
    where
        T: ScoreTarget + ?Sized,
    {
        target.validate(field, &self.layout)?;
        let scores = target.map_diagnoses(field, |text| self.score_text(text))?;
        target.with_scores(&self.layout, &scores)
    }

    /// Score a sequence of record batches, keeping their order
    ///
    /// Every batch is validated before scoring starts, so a bad field name
    /// produces an error and no output. The file readers return an empty
    /// batch for tables without rows, so the check also covers those.
    pub fn score_batches(&self, batches: &[RecordBatch], field: &str) -> Result<Vec<RecordBatch>> {
        self.score_batches_inner(batches, field, None)
    }

    /// Like [`FrailtyScorer::score_batches`], advancing `progress` once per batch
    pub fn score_batches_with_progress(
        &self,
        batches: &[RecordBatch],
        field: &str,
        progress: &ProgressBar,
    ) -> Result<Vec<RecordBatch>> {
        self.score_batches_inner(batches, field, Some(progress))
    }

    fn score_batches_inner(
        &self,
        batches: &[RecordBatch],
        field: &str,
        progress: Option<&ProgressBar>,
    ) -> Result<Vec<RecordBatch>> {
        for batch in batches {
            batch.validate(field, &self.layout)?;
        }

        let score_one = |batch: &RecordBatch| {
            let scored = self.score(batch, field);
            if let Some(pb) = progress {
                pb.inc(1);
            }
            scored
        };

        let scored = if self.parallel {
            batches.par_iter().map(score_one).collect::<Result<Vec<_>>>()?
        } else {
            batches.iter().map(score_one).collect::<Result<Vec<_>>>()?
        };

        log::debug!(
            "Scored {} rows in {} batches against {} fragments",
            scored.iter().map(RecordBatch::num_rows).sum::<usize>(),
            scored.len(),
            self.table.len()
        );
        Ok(scored)
    }
}

/// Apply the frailty score to record batches using the HFRS table
pub fn apply_frailty_score(batches: &[RecordBatch], config: &FrailtyConfig) -> Result<Vec<RecordBatch>> {
    FrailtyScorer::from_config(config).score_batches(batches, &config.diagnosis_field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use codes::CodeWeight;

    #[test]
    fn test_score_text_substring_semantics() {
        let scorer = FrailtyScorer::new();
        let table = scorer.table();

        let result = scorer.score_text(Some("F001"));
        assert_eq!(result.indicators[table.position("F00").unwrap()], 7.1);
        assert_eq!(result.score, 7.1);
        assert_eq!(result.group, FrailtyGroup::Medium);

        let inner = scorer.score_text(Some("XF00Y"));
        assert_eq!(inner.score, 7.1);
    }

    #[test]
    fn test_score_text_is_case_sensitive() {
        let scorer = FrailtyScorer::new();
        let result = scorer.score_text(Some("f00"));
        assert!(!result.has_matches());
        assert_eq!(result.group, FrailtyGroup::Null);
    }

    #[test]
    fn test_missing_and_empty_text() {
        let scorer = FrailtyScorer::new();
        for text in [None, Some("")] {
            let result = scorer.score_text(text);
            assert_eq!(result.indicators.len(), 109);
            assert!(result.indicators.iter().all(|&v| v == 0.0));
            assert_eq!(result.score, 0.0);
            assert_eq!(result.group, FrailtyGroup::Null);
        }
    }

    #[test]
    fn test_fragment_counted_once() {
        let scorer = FrailtyScorer::new();
        let result = scorer.score_text(Some("R50|R501|R509"));
        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.score, 0.1);
    }

    #[test]
    fn test_threshold_sums_are_exact() {
        let scorer = FrailtyScorer::new();

        let medium = scorer.score_text(Some("T838|S422|R11"));
        assert_eq!(medium.matched.len(), 3);
        assert_eq!(medium.score, 5.0);
        assert_eq!(medium.group, FrailtyGroup::Medium);

        let also_medium = scorer.score_text(Some("T83,E87,K52"));
        assert_eq!(also_medium.score, 5.0);
        assert_eq!(also_medium.group, FrailtyGroup::Medium);
    }

    #[test]
    fn test_custom_table() {
        let table = ReferenceTable::from_entries(&[
            CodeWeight::new("AB", 10.0),
            CodeWeight::new("CD", 6.0),
        ])
        .unwrap();
        let scorer = FrailtyScorer::with_table(&table, &FrailtyConfig::default());

        let result = scorer.score_text(Some("xxABxxCD"));
        assert_eq!(result.indicators, vec![10.0, 6.0]);
        assert_eq!(result.group, FrailtyGroup::High);
        assert_eq!(scorer.layout().indicators, vec!["icd_AB", "icd_CD"]);
    }
}
