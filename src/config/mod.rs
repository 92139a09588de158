//! Configuration for frailty scoring.

use crate::utils::{DEFAULT_BATCH_SIZE, get_batch_size};

/// Default name of the diagnosis text column
pub const DEFAULT_DIAGNOSIS_FIELD: &str = "diagnoses";

/// Default prefix for per-fragment indicator columns
pub const DEFAULT_INDICATOR_PREFIX: &str = "icd_";

/// Default name of the summed score column
pub const DEFAULT_SCORE_COLUMN: &str = "frailty_score";

/// Default name of the risk group column
pub const DEFAULT_GROUP_COLUMN: &str = "frailty_group";

/// Configuration for the `FrailtyScorer` and the file collaborators around it
#[derive(Debug, Clone)]
pub struct FrailtyConfig {
    /// Column holding the free-text diagnosis codes
    pub diagnosis_field: String,
    /// Prefix prepended to each fragment to name its indicator column
    pub indicator_prefix: String,
    /// Name of the score column
    pub score_column: String,
    /// Name of the group column
    pub group_column: String,
    /// Score multiple record batches in parallel
    pub parallel: bool,
    /// Worker threads used when scoring in parallel
    pub num_threads: usize,
    /// Rows per record batch when reading files
    pub batch_size: usize,
}

impl Default for FrailtyConfig {
    fn default() -> Self {
        Self {
            diagnosis_field: DEFAULT_DIAGNOSIS_FIELD.to_string(),
            indicator_prefix: DEFAULT_INDICATOR_PREFIX.to_string(),
            score_column: DEFAULT_SCORE_COLUMN.to_string(),
            group_column: DEFAULT_GROUP_COLUMN.to_string(),
            parallel: true,
            num_threads: num_cpus::get(),
            batch_size: get_batch_size().unwrap_or(DEFAULT_BATCH_SIZE),
        }
    }
}

impl FrailtyConfig {
    /// Use a different diagnosis column
    #[must_use]
    pub fn with_diagnosis_field(mut self, field: impl Into<String>) -> Self {
        self.diagnosis_field = field.into();
        self
    }

    /// Use a different indicator column prefix
    #[must_use]
    pub fn with_indicator_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.indicator_prefix = prefix.into();
        self
    }

    /// Enable or disable batch-level parallelism
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_column_names() {
        let config = FrailtyConfig::default();
        assert_eq!(config.diagnosis_field, "diagnoses");
        assert_eq!(config.indicator_prefix, "icd_");
        assert_eq!(config.score_column, "frailty_score");
        assert_eq!(config.group_column, "frailty_group");
        assert!(config.parallel);
        assert!(config.num_threads >= 1);
    }

    #[test]
    fn test_builder_overrides() {
        let config = FrailtyConfig::default()
            .with_diagnosis_field("DIAG")
            .with_indicator_prefix("hfrs_")
            .with_parallel(false);
        assert_eq!(config.diagnosis_field, "DIAG");
        assert_eq!(config.indicator_prefix, "hfrs_");
        assert!(!config.parallel);
    }
}
