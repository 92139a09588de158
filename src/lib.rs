//! Hospital Frailty Risk Score computation over tabular diagnosis data.
//!
//! Records carry a free-text diagnosis field. Each of the 109 reference
//! fragments found in that text adds its weight to the record's frailty
//! score, and the score is bucketed into a risk group. Arrow record batches
//! and JSON key-value rows can be scored directly; Parquet, CSV and JSON
//! lines files are read and written through [`utils::io`].

pub mod adapters;
pub mod algorithm;
pub mod config;
pub mod demo;
pub mod error;
pub mod utils;

// Re-export the most common types for easier use
pub use adapters::{ColumnLayout, Row, ScoreTarget};
pub use algorithm::frailty::codes::{CodeWeight, HFRS_CODE_WEIGHTS, ReferenceTable, sum_weights};
pub use algorithm::frailty::group::{FrailtyGroup, GROUP_THRESHOLDS};
pub use algorithm::frailty::report::FrailtyReport;
pub use algorithm::frailty::{FrailtyScore, FrailtyScorer, apply_frailty_score};
pub use config::FrailtyConfig;
pub use error::{ConfigurationError, FrailtyError, Result};

// Arrow types
pub use arrow::record_batch::RecordBatch;
