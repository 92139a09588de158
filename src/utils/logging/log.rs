//! Logging utilities
//!
//! Consistent log lines for file operations and scoring runs.

use std::path::Path;
use std::time::Duration;

/// Log the start of a file operation
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file being operated on
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log the completion of a file operation
///
/// # Arguments
/// * `operation` - Past-tense verb for the operation ("read", "wrote")
/// * `path` - Path of the file that was operated on
/// * `rows` - Number of rows moved
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(operation: &str, path: &Path, rows: usize, elapsed: Option<Duration>) {
    match elapsed {
        Some(duration) => log::info!(
            "Successfully {} {} rows ({}) in {:?}",
            operation,
            rows,
            path.display(),
            duration
        ),
        None => log::info!("Successfully {} {} rows ({})", operation, rows, path.display()),
    }
}

/// Log a warning, optionally tied to a file
pub fn log_warning(message: &str, path: Option<&Path>) {
    if let Some(path) = path {
        log::warn!("{}: {}", message, path.display());
    } else {
        log::warn!("{message}");
    }
}
