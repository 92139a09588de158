//! Reading and writing tables
//!
//! The file format is chosen from the path: directories and `.parquet`
//! files are Parquet, `.csv` is CSV, and `.json`, `.jsonl` or `.ndjson` is
//! JSON lines. Parquet and CSV are read as Arrow record batches; JSON lines
//! are read as key-value rows with [`read_json_rows`].

pub mod csv;
pub mod json;
pub mod parquet;

use std::path::Path;

use arrow::record_batch::RecordBatch;

use crate::error::{FrailtyError, Result};

pub use self::csv::{read_csv, write_csv};
pub use self::json::{read_json_rows, write_json_lines, write_json_rows};
pub use self::parquet::{load_parquet_files_parallel, read_parquet, write_parquet};

/// Supported table file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Apache Parquet
    Parquet,
    /// Comma-separated values with a header row
    Csv,
    /// One JSON object per line
    JsonLines,
}

impl FileFormat {
    /// Determine the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("parquet") => Ok(Self::Parquet),
            Some("csv") => Ok(Self::Csv),
            Some("json" | "jsonl" | "ndjson") => Ok(Self::JsonLines),
            _ => Err(FrailtyError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Read a table from a file or a directory of Parquet files
///
/// JSON lines files are rejected here; read them with [`read_json_rows`].
pub fn read_table(path: &Path, batch_size: usize) -> Result<Vec<RecordBatch>> {
    if path.is_dir() {
        return load_parquet_files_parallel(path, batch_size);
    }

    match FileFormat::from_path(path)? {
        FileFormat::Parquet => read_parquet(path, batch_size),
        FileFormat::Csv => read_csv(path, batch_size),
        FileFormat::JsonLines => Err(FrailtyError::UnsupportedFormat(format!(
            "{} (JSON lines are read as rows, not record batches)",
            path.display()
        ))),
    }
}

/// Write a table in the format given by the path's extension
pub fn write_table(path: &Path, batches: &[RecordBatch]) -> Result<()> {
    match FileFormat::from_path(path)? {
        FileFormat::Parquet => write_parquet(path, batches),
        FileFormat::Csv => write_csv(path, batches),
        FileFormat::JsonLines => write_json_lines(path, batches),
    }
}
