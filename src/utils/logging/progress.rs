//! Progress reporting for multi-batch scoring runs, using the indicatif crate.

use indicatif::{ProgressBar, ProgressStyle};

/// Template for the batch scoring progress bar
pub const DEFAULT_MAIN_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} batches ({per_sec}) {msg}";

/// Create the main progress bar with a standardized style
///
/// Falls back to indicatif's default bar style if the template is rejected.
#[must_use]
pub fn create_main_progress_bar(length: u64, description: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new(length);
    let style = ProgressStyle::default_bar()
        .template(DEFAULT_MAIN_TEMPLATE)
        .map_or_else(|_| ProgressStyle::default_bar(), |style| style.progress_chars("#>-"));
    pb.set_style(style);

    if let Some(desc) = description {
        pb.set_message(desc.to_string());
    }

    pb
}

/// Finish a progress bar with an optional completion message
pub fn finish_progress_bar(pb: &ProgressBar, message: Option<&str>) {
    if let Some(msg) = message {
        pb.finish_with_message(msg.to_string());
    } else {
        pb.finish();
    }
}
