//! Summary statistics over scored tables

use std::collections::BTreeMap;
use std::fmt;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::Float64Type;
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use serde::Serialize;
use serde_json::Value;

use super::codes::ReferenceTable;
use super::group::FrailtyGroup;
use crate::adapters::{ColumnLayout, Row};
use crate::error::{FrailtyError, Result};

/// How often a fragment matched across a table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FragmentCount {
    /// Reference fragment
    pub fragment: &'static str,
    /// Rows in which it matched
    pub rows: usize,
}

/// Group distribution and score statistics for a scored table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrailtyReport {
    /// Number of scored rows
    pub rows: usize,
    /// Rows per risk group, every group present
    pub groups: BTreeMap<FrailtyGroup, usize>,
    /// Mean score, 0 for an empty table
    pub mean_score: f64,
    /// Highest score, 0 for an empty table
    pub max_score: f64,
    /// Matched fragments, most frequent first
    pub top_fragments: Vec<FragmentCount>,
    #[serde(skip)]
    fragment_rows: Vec<usize>,
    #[serde(skip)]
    score_sum: f64,
}

impl FrailtyReport {
    /// Number of fragments kept in `top_fragments`
    pub const TOP_FRAGMENTS: usize = 10;

    fn empty(table: &ReferenceTable) -> Self {
        Self {
            rows: 0,
            groups: FrailtyGroup::ALL.into_iter().map(|g| (g, 0)).collect(),
            mean_score: 0.0,
            max_score: 0.0,
            top_fragments: Vec::new(),
            fragment_rows: vec![0; table.len()],
            score_sum: 0.0,
        }
    }

    fn add(&mut self, score: f64, group: FrailtyGroup, matched: impl IntoIterator<Item = usize>) {
        self.rows += 1;
        *self.groups.entry(group).or_default() += 1;
        self.score_sum += score;
        self.max_score = self.max_score.max(score);
        for idx in matched {
            self.fragment_rows[idx] += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(mut self, table: &ReferenceTable) -> Self {
        if self.rows > 0 {
            self.mean_score = self.score_sum / self.rows as f64;
        }
        self.top_fragments = table
            .entries()
            .iter()
            .zip(&self.fragment_rows)
            .filter(|&(_, &rows)| rows > 0)
            .map(|(entry, &rows)| FragmentCount {
                fragment: entry.fragment,
                rows,
            })
            .sorted_by(|a, b| b.rows.cmp(&a.rows))
            .take(Self::TOP_FRAGMENTS)
            .collect();
        self
    }

    /// Build a report from record batches produced by the scorer
    pub fn from_batches(
        batches: &[RecordBatch],
        layout: &ColumnLayout,
        table: &ReferenceTable,
    ) -> Result<Self> {
        let mut report = Self::empty(table);

        for batch in batches {
            let scores = scored_column(batch, &layout.score)?
                .as_primitive_opt::<Float64Type>()
                .ok_or_else(|| scored_column_error(&layout.score, "Float64"))?;
            let groups = scored_column(batch, &layout.group)?
                .as_string_opt::<i32>()
                .ok_or_else(|| scored_column_error(&layout.group, "Utf8"))?;
            let indicators = layout
                .indicators
                .iter()
                .map(|name| {
                    scored_column(batch, name)?
                        .as_primitive_opt::<Float64Type>()
                        .cloned()
                        .ok_or_else(|| scored_column_error(name, "Float64"))
                })
                .collect::<Result<Vec<_>>>()?;

            for row in 0..batch.num_rows() {
                let group = groups
                    .is_valid(row)
                    .then(|| FrailtyGroup::from_label(groups.value(row)))
                    .flatten()
                    .unwrap_or(FrailtyGroup::Null);
                let matched = indicators
                    .iter()
                    .positions(|values| values.is_valid(row) && values.value(row) > 0.0);
                report.add(scores.value(row), group, matched);
            }
        }

        Ok(report.finish(table))
    }

    /// Build a report from key-value rows produced by the scorer
    pub fn from_rows(rows: &[Row], layout: &ColumnLayout, table: &ReferenceTable) -> Self {
        let mut report = Self::empty(table);

        for row in rows {
            let score = row.get(&layout.score).and_then(Value::as_f64).unwrap_or(0.0);
            let group = row
                .get(&layout.group)
                .and_then(Value::as_str)
                .and_then(FrailtyGroup::from_label)
                .unwrap_or(FrailtyGroup::Null);
            let matched = layout.indicators.iter().positions(|name| {
                row.get(name).and_then(Value::as_f64).is_some_and(|v| v > 0.0)
            });
            report.add(score, group, matched);
        }

        report.finish(table)
    }

    /// Rows in a group
    #[must_use]
    pub fn count(&self, group: FrailtyGroup) -> usize {
        self.groups.get(&group).copied().unwrap_or(0)
    }
}

fn scored_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch.column_by_name(name).ok_or_else(|| {
        FrailtyError::field_not_found(
            name,
            batch.schema().fields().iter().map(|f| f.name().clone()),
        )
    })
}

fn scored_column_error(name: &str, expected: &str) -> FrailtyError {
    FrailtyError::Arrow(arrow::error::ArrowError::SchemaError(format!(
        "scored column '{name}' is not {expected}"
    )))
}

impl fmt::Display for FrailtyReport {
    #[allow(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scored rows: {}", self.rows)?;
        for group in FrailtyGroup::ALL.into_iter().rev() {
            let count = self.count(group);
            let share = if self.rows == 0 {
                0.0
            } else {
                count as f64 * 100.0 / self.rows as f64
            };
            writeln!(f, "  {group:<6} {count:>8} ({share:5.1}%)")?;
        }
        writeln!(f, "Mean score: {:.2}", self.mean_score)?;
        writeln!(f, "Max score:  {:.2}", self.max_score)?;
        if !self.top_fragments.is_empty() {
            writeln!(f, "Most frequent fragments:")?;
            for count in &self.top_fragments {
                writeln!(f, "  {:<4} {:>8}", count.fragment, count.rows)?;
            }
        }
        Ok(())
    }
}
