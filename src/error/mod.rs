//! Error handling for frailty scoring.
//!
//! Scoring itself only fails on configuration problems, which are detected
//! before any row is touched. The remaining variants come from the file and
//! Arrow collaborators around the scorer.

use std::io;

use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Problems with how the scorer was asked to run
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// The diagnosis field is not present on the input table
    #[error("diagnosis field '{field}' not found (available: {})", .available.join(", "))]
    FieldNotFound {
        /// Requested field name
        field: String,
        /// Field names the input does provide
        available: Vec<String>,
    },

    /// The diagnosis column has a type that cannot be read as text
    #[error("diagnosis field '{field}' has type {data_type} which cannot be read as text")]
    UnsupportedFieldType {
        /// Requested field name
        field: String,
        /// Arrow type of the column
        data_type: DataType,
    },

    /// An output column would overwrite an existing input column
    #[error("output column '{column}' already exists on the input")]
    ColumnCollision {
        /// Colliding column name
        column: String,
    },

    /// A reference table entry is unusable
    #[error("invalid reference entry '{fragment}': {reason}")]
    InvalidReferenceEntry {
        /// Fragment of the offending entry
        fragment: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Errors produced by this crate
#[derive(Debug, thiserror::Error)]
pub enum FrailtyError {
    /// Invalid scorer configuration
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error opening, reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error serializing rows or reports
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Scores handed to an adapter do not line up with its rows
    #[error("expected {expected} scores, got {actual}")]
    ScoreCountMismatch {
        /// Rows in the table
        expected: usize,
        /// Scores supplied
        actual: usize,
    },

    /// File extension not recognised as a table format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}

impl FrailtyError {
    /// Whether this is a configuration-level failure
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Shorthand for a missing diagnosis field
    pub fn field_not_found<I, S>(field: &str, available: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ConfigurationError::FieldNotFound {
            field: field.to_string(),
            available: available.into_iter().map(Into::into).collect(),
        }
        .into()
    }
}

/// Result type for frailty scoring operations
pub type Result<T> = std::result::Result<T, FrailtyError>;
