//! Parquet file operations
//!
//! Reading Parquet files (or directories of them) into Arrow record batches
//! and writing scored batches back out.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use rayon::prelude::*;

use crate::error::{FrailtyError, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Read a Parquet file into Arrow record batches
///
/// A file without rows yields one empty batch, so the schema is still
/// available for validation.
///
/// # Arguments
/// * `path` - Path to the Parquet file
/// * `batch_size` - Rows per record batch
pub fn read_parquet(path: &Path, batch_size: usize) -> Result<Vec<RecordBatch>> {
    let start = Instant::now();
    log_operation_start("Reading parquet file", path);

    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?.with_batch_size(batch_size);
    let schema = Arc::clone(builder.schema());
    let reader = builder.build()?;

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

/// Find all Parquet files in a directory, sorted by file name
pub fn find_parquet_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let parquet_files = std::fs::read_dir(dir)?
        .map_ok(|entry| entry.path())
        .filter_ok(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "parquet"))
        .collect::<std::result::Result<Vec<_>, _>>()?
        .into_iter()
        .sorted()
        .collect_vec();

    if parquet_files.is_empty() {
        log_warning("No Parquet files found in directory", Some(dir));
    }

    Ok(parquet_files)
}

/// Load all Parquet files from a directory in parallel
///
/// Batches are returned file by file in file name order. A directory
/// without Parquet files is an error, as there is no schema to check.
pub fn load_parquet_files_parallel(dir: &Path, batch_size: usize) -> Result<Vec<RecordBatch>> {
    let parquet_files = find_parquet_files(dir)?;
    if parquet_files.is_empty() {
        return Err(FrailtyError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no Parquet files in {}", dir.display()),
        )));
    }

    let per_file = parquet_files
        .par_iter()
        .map(|path| read_parquet(path, batch_size))
        .collect::<Result<Vec<_>>>()?;

    let combined = per_file.into_iter().flatten().collect_vec();
    log::info!(
        "Successfully loaded {} batches from {} Parquet files",
        combined.len(),
        parquet_files.len()
    );
    Ok(combined)
}

/// Write record batches to a Snappy-compressed Parquet file
///
/// Writing an empty slice creates no file.
pub fn write_parquet(path: &Path, batches: &[RecordBatch]) -> Result<()> {
    let Some(first) = batches.first() else {
        log_warning("No record batches to write", Some(path));
        return Ok(());
    };

    let start = Instant::now();
    log_operation_start("Writing parquet file", path);

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, first.schema(), Some(props))?;
    for batch in batches {
        writer.write(batch)?;
    }
    writer.close()?;

    log_operation_complete(
        "wrote",
        path,
        batches.iter().map(RecordBatch::num_rows).sum(),
        Some(start.elapsed()),
    );
    Ok(())
}
