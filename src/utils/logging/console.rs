//! Console output utilities
//!
//! Human-readable previews of scored tables for the command line.

use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};

use crate::adapters::ColumnLayout;
use crate::error::Result;

/// Print summary information about record batches
pub fn print_batch_summary(batches: &[RecordBatch], elapsed: std::time::Duration) {
    println!("Scored {} record batches in {:?}", batches.len(), elapsed);
    println!(
        "Total rows: {}",
        batches.iter().map(RecordBatch::num_rows).sum::<usize>()
    );
}

/// Print the first rows of a scored batch
///
/// Input columns are shown as they are. Of the indicator columns only the
/// non-zero ones are listed, by fragment.
pub fn print_scored_rows(batch: &RecordBatch, layout: &ColumnLayout, num_rows: usize) -> Result<()> {
    let options = FormatOptions::default().with_null("NULL");
    let schema = batch.schema();

    let input_columns = schema
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, field)| !layout.names().any(|name| name == field.name().as_str()))
        .map(|(idx, field)| {
            ArrayFormatter::try_new(batch.column(idx).as_ref(), &options)
                .map(|formatter| (field.name().as_str(), formatter))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let score = batch
        .column_by_name(&layout.score)
        .map(|column| ArrayFormatter::try_new(column.as_ref(), &options))
        .transpose()?;
    let group = batch
        .column_by_name(&layout.group)
        .map(|column| ArrayFormatter::try_new(column.as_ref(), &options))
        .transpose()?;
    let indicators = layout
        .indicators
        .iter()
        .filter_map(|name| batch.column_by_name(name).map(|column| (name, column)))
        .collect::<Vec<_>>();

    println!("First {} rows:", num_rows.min(batch.num_rows()));
    for row in 0..num_rows.min(batch.num_rows()) {
        let mut parts: Vec<String> = input_columns
            .iter()
            .map(|(name, formatter)| format!("{name}={}", formatter.value(row)))
            .collect();

        if let Some(score) = &score {
            parts.push(format!("{}={}", layout.score, score.value(row)));
        }
        if let Some(group) = &group {
            parts.push(format!("{}={}", layout.group, group.value(row)));
        }

        let matched: Vec<&str> = indicators
            .iter()
            .filter(|(_, column)| {
                column
                    .as_any()
                    .downcast_ref::<arrow::array::Float64Array>()
                    .is_some_and(|values| values.is_valid(row) && values.value(row) > 0.0)
            })
            .map(|(name, _)| name.as_str())
            .collect();
        parts.push(format!("matched=[{}]", matched.join(", ")));

        println!("  Row {row}: {}", parts.join(", "));
    }
    Ok(())
}
