//! CSV file operations
//!
//! The CSV schema is inferred from the file with a header row.

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Rows sampled for schema inference
const SCHEMA_INFERENCE_ROWS: usize = 1000;

/// Read a CSV file with a header row into Arrow record batches
///
/// A header-only file yields one empty batch carrying the header columns.
pub fn read_csv(path: &Path, batch_size: usize) -> Result<Vec<RecordBatch>> {
    let start = Instant::now();
    log_operation_start("Reading CSV file", path);

    let mut file = File::open(path)?;
    let (schema, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, Some(SCHEMA_INFERENCE_ROWS))?;
    file.rewind()?;

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_header(true)
        .with_batch_size(batch_size)
        .build(file)?;
    let mut batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    if batches.is_empty() {
        batches.push(RecordBatch::new_empty(schema));
    }

    log_operation_complete(
        "read",
        path,
        batches.iter().map(RecordBatch::num_rows).sum(),
        Some(start.elapsed()),
    );
    Ok(batches)
}

/// Write record batches to a CSV file with a header row
pub fn write_csv(path: &Path, batches: &[RecordBatch]) -> Result<()> {
    if batches.is_empty() {
        log_warning("No record batches to write", Some(path));
        return Ok(());
    }

    let start = Instant::now();
    log_operation_start("Writing CSV file", path);

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    for batch in batches {
        writer.write(batch)?;
    }

    log_operation_complete(
        "wrote",
        path,
        batches.iter().map(RecordBatch::num_rows).sum(),
        Some(start.elapsed()),
    );
    Ok(())
}
