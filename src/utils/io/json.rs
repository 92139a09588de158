//! JSON lines input and output
//!
//! JSON lines files are read as key-value rows rather than Arrow batches,
//! so records with differing keys can be scored as they are.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use arrow::json::LineDelimitedWriter;
use arrow::record_batch::RecordBatch;
use serde_json::Value;

use crate::adapters::Row;
use crate::error::{FrailtyError, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Read a JSON lines file into key-value rows
///
/// Blank lines are skipped. Every other line must hold a JSON object.
pub fn read_json_rows(path: &Path) -> Result<Vec<Row>> {
    let start = Instant::now();
    log_operation_start("Reading JSON lines file", path);

    let reader = BufReader::new(File::open(path)?);
    let mut rows = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(&line)? {
            Value::Object(row) => rows.push(row),
            other => {
                return Err(FrailtyError::UnsupportedFormat(format!(
                    "{} line {}: expected a JSON object, found {}",
                    path.display(),
                    line_no + 1,
                    other
                )));
            }
        }
    }

    log_operation_complete("read", path, rows.len(), Some(start.elapsed()));
    Ok(rows)
}

/// Write key-value rows as one JSON object per line
pub fn write_json_rows(path: &Path, rows: &[Row]) -> Result<()> {
    let start = Instant::now();
    log_operation_start("Writing JSON lines file", path);

    let mut writer = BufWriter::new(File::create(path)?);
    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    log_operation_complete("wrote", path, rows.len(), Some(start.elapsed()));
    Ok(())
}

/// Write record batches as one JSON object per line
///
/// Null values are omitted from the objects.
pub fn write_json_lines(path: &Path, batches: &[RecordBatch]) -> Result<()> {
    if batches.is_empty() {
        log_warning("No record batches to write", Some(path));
        return Ok(());
    }

    let start = Instant::now();
    log_operation_start("Writing JSON lines file", path);

    let mut writer = LineDelimitedWriter::new(BufWriter::new(File::create(path)?));
    for batch in batches {
        writer.write(batch)?;
    }
    writer.finish()?;

    log_operation_complete(
        "wrote",
        path,
        batches.iter().map(RecordBatch::num_rows).sum(),
        Some(start.elapsed()),
    );
    Ok(())
}
