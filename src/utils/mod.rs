//! Shared helpers for logging, progress reporting and environment lookups

pub mod io;
pub mod logging;

pub use logging::{log_operation_complete, log_operation_start, log_warning};

/// Default number of rows per record batch when reading files
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Helper function to get batch size from environment
#[must_use]
pub fn get_batch_size() -> Option<usize> {
    std::env::var("FRAILTY_BATCH_SIZE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&size| size > 0)
}
