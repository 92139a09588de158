//! Table adapters for the frailty scorer
//!
//! The scorer does not know the concrete shape of the data it scores. Any
//! table that can hand out the text of a named column row by row, and can
//! be rebuilt with extra columns attached, implements [`ScoreTarget`].
//! Implementations are provided for Arrow record batches and for vectors of
//! JSON key-value rows.

pub mod record_batch;
pub mod rows;

pub use rows::Row;

use crate::algorithm::frailty::FrailtyScore;
use crate::algorithm::frailty::codes::ReferenceTable;
use crate::config::FrailtyConfig;
use crate::error::{ConfigurationError, FrailtyError, Result};

/// Names of the columns added by the scorer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    /// One indicator column per reference fragment, in table order
    pub indicators: Vec<String>,
    /// Summed score column
    pub score: String,
    /// Risk group column
    pub group: String,
}

impl ColumnLayout {
    /// Layout for a reference table and configuration
    #[must_use]
    pub fn new(table: &ReferenceTable, config: &FrailtyConfig) -> Self {
        Self {
            indicators: table.column_names(&config.indicator_prefix),
            score: config.score_column.clone(),
            group: config.group_column.clone(),
        }
    }

    /// All added column names, indicators first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.indicators
            .iter()
            .chain([&self.score, &self.group])
            .map(String::as_str)
    }

    /// Fail if any added column name is already taken
    pub fn check_collisions<F>(&self, exists: F) -> Result<()>
    where
        F: Fn(&str) -> bool,
    {
        match self.names().find(|name| exists(name)) {
            Some(column) => Err(ConfigurationError::ColumnCollision {
                column: column.to_string(),
            }
            .into()),
            None => Ok(()),
        }
    }
}

/// Fail unless there is exactly one score per row
pub(crate) fn check_score_count(rows: usize, scores: &[FrailtyScore]) -> Result<()> {
    if rows == scores.len() {
        Ok(())
    } else {
        Err(FrailtyError::ScoreCountMismatch {
            expected: rows,
            actual: scores.len(),
        })
    }
}

/// A table the frailty scorer can read diagnosis text from and attach scores to
pub trait ScoreTarget {
    /// The table type produced after scoring
    type Output;

    /// Check that `field` can be read and that the output columns are free
    fn validate(&self, field: &str, layout: &ColumnLayout) -> Result<()>;

    /// Apply `f` to the diagnosis text of every row, in row order
    fn map_diagnoses<T, F>(&self, field: &str, f: F) -> Result<Vec<T>>
    where
        F: FnMut(Option<&str>) -> T;

    /// Rebuild the table with one extra column per name in `layout`
    ///
    /// `scores` holds one entry per row, in row order. Any other count is
    /// an error.
    fn with_scores(&self, layout: &ColumnLayout, scores: &[FrailtyScore]) -> Result<Self::Output>;
}
