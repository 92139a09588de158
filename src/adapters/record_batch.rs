//! Scoring Arrow record batches
//!
//! The diagnosis column may be any Arrow type that casts to `Utf8`; string
//! columns are read directly. Binary columns are decoded lossily, so bytes
//! that are not UTF-8 match no fragment instead of failing the batch. Scored batches keep every input column and
//! the schema metadata, followed by the indicator, score and group columns.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, Float64Array, StringArray};
use arrow::compute::{can_cast_types, cast};
use arrow::datatypes::{DataType, Field, FieldRef, Schema};
use arrow::record_batch::RecordBatch;

use super::{ColumnLayout, ScoreTarget, check_score_count};
use crate::algorithm::frailty::FrailtyScore;
use crate::error::{ConfigurationError, FrailtyError, Result};

fn diagnosis_column_index(batch: &RecordBatch, field: &str) -> Result<usize> {
    let schema = batch.schema();
    schema.index_of(field).map_err(|_| {
        FrailtyError::field_not_found(
            field,
            schema.fields().iter().map(|f| f.name().clone()),
        )
    })
}

const fn is_binary(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Binary | DataType::LargeBinary | DataType::BinaryView | DataType::FixedSizeBinary(_)
    )
}

fn is_readable_as_text(data_type: &DataType) -> bool {
    is_binary(data_type) || can_cast_types(data_type, &DataType::Utf8)
}

fn lossy_text<'a>(values: impl Iterator<Item = Option<&'a [u8]>>) -> ArrayRef {
    Arc::new(
        values
            .map(|bytes| bytes.map(String::from_utf8_lossy))
            .collect::<StringArray>(),
    )
}

fn diagnosis_text_array(batch: &RecordBatch, field: &str) -> Result<ArrayRef> {
    let column = batch.column(diagnosis_column_index(batch, field)?);
    match column.data_type() {
        DataType::Utf8 => Ok(Arc::clone(column)),
        DataType::Binary => Ok(lossy_text(column.as_binary::<i32>().iter())),
        DataType::LargeBinary => Ok(lossy_text(column.as_binary::<i64>().iter())),
        DataType::BinaryView => Ok(lossy_text(column.as_binary_view().iter())),
        DataType::FixedSizeBinary(_) => Ok(lossy_text(column.as_fixed_size_binary().iter())),
        other if can_cast_types(other, &DataType::Utf8) => Ok(cast(column, &DataType::Utf8)?),
        other => Err(ConfigurationError::UnsupportedFieldType {
            field: field.to_string(),
            data_type: other.clone(),
        }
        .into()),
    }
}

impl ScoreTarget for RecordBatch {
    type Output = Self;

    fn validate(&self, field: &str, layout: &ColumnLayout) -> Result<()> {
        let idx = diagnosis_column_index(self, field)?;
        let data_type = self.schema().field(idx).data_type().clone();
        if !is_readable_as_text(&data_type) {
            return Err(ConfigurationError::UnsupportedFieldType {
                field: field.to_string(),
                data_type,
            }
            .into());
        }

        let schema = self.schema();
        layout.check_collisions(|name| schema.column_with_name(name).is_some())
    }

    fn map_diagnoses<T, F>(&self, field: &str, f: F) -> Result<Vec<T>>
    where
        F: FnMut(Option<&str>) -> T,
    {
        let texts = diagnosis_text_array(self, field)?;
        Ok(texts.as_string::<i32>().iter().map(f).collect())
    }

    fn with_scores(&self, layout: &ColumnLayout, scores: &[FrailtyScore]) -> Result<Self> {
        check_score_count(self.num_rows(), scores)?;

        let schema = self.schema();
        let mut fields: Vec<FieldRef> = schema.fields().iter().cloned().collect();
        let mut columns: Vec<ArrayRef> = self.columns().to_vec();

        for (idx, name) in layout.indicators.iter().enumerate() {
            fields.push(Arc::new(Field::new(name, DataType::Float64, false)));
            columns.push(Arc::new(Float64Array::from_iter_values(
                scores.iter().map(|s| s.indicators[idx]),
            )));
        }

        fields.push(Arc::new(Field::new(&layout.score, DataType::Float64, false)));
        columns.push(Arc::new(Float64Array::from_iter_values(
            scores.iter().map(|s| s.score),
        )));

        fields.push(Arc::new(Field::new(&layout.group, DataType::Utf8, false)));
        columns.push(Arc::new(StringArray::from_iter_values(
            scores.iter().map(|s| s.group.as_str()),
        )));

        let schema = Schema::new_with_metadata(fields, schema.metadata().clone());
        Ok(Self::try_new(Arc::new(schema), columns)?)
    }
}
