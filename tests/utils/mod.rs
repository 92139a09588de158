use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::{ArrayRef, AsArray, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Float64Type, Schema};
use arrow::record_batch::RecordBatch;
use frailty_score::Row;
use serde_json::Value;

/// Build a batch with an `id` column and a nullable `diagnoses` column
#[must_use]
pub fn diagnosis_batch(first_id: i32, diagnoses: &[Option<&str>]) -> RecordBatch {
    let ids: Vec<i32> = (0..diagnoses.len())
        .map(|offset| first_id + i32::try_from(offset).unwrap())
        .collect();
    let schema = Schema::new(vec![
        Field::new("id", DataType::Int32, false),
        Field::new("diagnoses", DataType::Utf8, true),
    ]);
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int32Array::from(ids)),
        Arc::new(diagnoses.iter().copied().collect::<StringArray>()),
    ];
    RecordBatch::try_new(Arc::new(schema), columns).unwrap()
}

/// Values of a Float64 column
#[must_use]
pub fn float_column(batch: &RecordBatch, name: &str) -> Vec<f64> {
    batch
        .column_by_name(name)
        .unwrap_or_else(|| panic!("missing column {name}"))
        .as_primitive::<Float64Type>()
        .values()
        .to_vec()
}

/// Values of a non-null Utf8 column
#[must_use]
pub fn string_column(batch: &RecordBatch, name: &str) -> Vec<String> {
    batch
        .column_by_name(name)
        .unwrap_or_else(|| panic!("missing column {name}"))
        .as_string::<i32>()
        .iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect()
}

/// Convert a JSON object literal into a row
#[must_use]
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A fresh path in the system temp directory
#[must_use]
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("frailty_score_{}_{name}", std::process::id()))
}
