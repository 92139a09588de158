//! Inline demonstration data
//!
//! A handful of synthetic patients whose diagnosis strings use the pipe and
//! comma separators seen in registry extracts.

use std::sync::Arc;

use arrow::array::{ArrayRef, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::config::DEFAULT_DIAGNOSIS_FIELD;
use crate::error::Result;

/// Patient identifier column of the demo batch
pub const DEMO_ID_FIELD: &str = "patient_id";

/// Sample patients as (id, age, diagnoses)
pub const DEMO_PATIENTS: [(&str, i32, Option<&str>); 8] = [
    ("P001", 84, Some("T838|Z960")),
    ("P002", 91, Some("F00|G81|G30")),
    ("P003", 67, Some("I10,E119")),
    ("P004", 72, None),
    ("P005", 58, Some("")),
    ("P006", 88, Some("N39,R29,F05")),
    ("P007", 79, Some("J18|R50")),
    ("P008", 83, Some("S720,W19,M81")),
];

/// Build the demo patients as a record batch
///
/// Columns are `patient_id`, `age` and the default diagnosis field.
pub fn demo_batch() -> Result<RecordBatch> {
    let schema = Schema::new(vec![
        Field::new(DEMO_ID_FIELD, DataType::Utf8, false),
        Field::new("age", DataType::Int32, false),
        Field::new(DEFAULT_DIAGNOSIS_FIELD, DataType::Utf8, true),
    ]);

    let ids: ArrayRef = Arc::new(StringArray::from_iter_values(
        DEMO_PATIENTS.iter().map(|(id, _, _)| *id),
    ));
    let ages: ArrayRef = Arc::new(Int32Array::from_iter_values(
        DEMO_PATIENTS.iter().map(|(_, age, _)| *age),
    ));
    let diagnoses: ArrayRef = Arc::new(
        DEMO_PATIENTS
            .iter()
            .map(|(_, _, diagnoses)| *diagnoses)
            .collect::<StringArray>(),
    );

    Ok(RecordBatch::try_new(
        Arc::new(schema),
        vec![ids, ages, diagnoses],
    )?)
}
