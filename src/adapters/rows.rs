//! Scoring generic key-value rows
//!
//! Rows are JSON objects. Different rows may carry different keys: the
//! diagnosis field counts as present if at least one row has it, and rows
//! without it are scored as having no diagnosis text. String values are
//! matched as they are, other non-null values by their JSON text.

use std::borrow::Cow;
use std::collections::BTreeSet;

use serde_json::{Map, Value};

use super::{ColumnLayout, ScoreTarget, check_score_count};
use crate::algorithm::frailty::FrailtyScore;
use crate::error::{FrailtyError, Result};

/// A key-value record
pub type Row = Map<String, Value>;

fn diagnosis_text<'a>(row: &'a Row, field: &str) -> Option<Cow<'a, str>> {
    match row.get(field)? {
        Value::Null => None,
        Value::String(text) => Some(Cow::Borrowed(text)),
        other => Some(Cow::Owned(other.to_string())),
    }
}

impl ScoreTarget for [Row] {
    type Output = Vec<Row>;

    fn validate(&self, field: &str, layout: &ColumnLayout) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        if !self.iter().any(|row| row.contains_key(field)) {
            let available: BTreeSet<&str> = self
                .iter()
                .flat_map(|row| row.keys().map(String::as_str))
                .collect();
            return Err(FrailtyError::field_not_found(field, available));
        }

        layout.check_collisions(|name| self.iter().any(|row| row.contains_key(name)))
    }

    fn map_diagnoses<T, F>(&self, field: &str, mut f: F) -> Result<Vec<T>>
    where
        F: FnMut(Option<&str>) -> T,
    {
        Ok(self
            .iter()
            .map(|row| f(diagnosis_text(row, field).as_deref()))
            .collect())
    }

    fn with_scores(&self, layout: &ColumnLayout, scores: &[FrailtyScore]) -> Result<Vec<Row>> {
        check_score_count(self.len(), scores)?;
        Ok(self
            .iter()
            .zip(scores)
            .map(|(row, score)| {
                let mut scored = row.clone();
                for (name, value) in layout.indicators.iter().zip(&score.indicators) {
                    scored.insert(name.clone(), Value::from(*value));
                }
                scored.insert(layout.score.clone(), Value::from(score.score));
                scored.insert(layout.group.clone(), Value::from(score.group.as_str()));
                scored
            })
            .collect())
    }
}

impl ScoreTarget for Vec<Row> {
    type Output = Self;

    fn validate(&self, field: &str, layout: &ColumnLayout) -> Result<()> {
        self.as_slice().validate(field, layout)
    }

    fn map_diagnoses<T, F>(&self, field: &str, f: F) -> Result<Vec<T>>
    where
        F: FnMut(Option<&str>) -> T,
    {
        self.as_slice().map_diagnoses(field, f)
    }

    fn with_scores(&self, layout: &ColumnLayout, scores: &[FrailtyScore]) -> Result<Self> {
        self.as_slice().with_scores(layout, scores)
    }
}
