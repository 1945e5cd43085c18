//! Pipeline errors.
//!
//! Aggregates subsystem errors via `From` conversions. A scoring run either
//! completes over the full table or fails with one of these; there is no
//! partial-result mode.

use super::{ConfigError, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No pairing reached the minimum sample size, so percentile thresholds
    /// are undefined. Reported as a typed condition, never a panic from the
    /// percentile routine.
    #[error("No pairing has at least {min_sample_size} opportunities ({total_pairs} pairs observed)")]
    NoQualifyingPairs {
        min_sample_size: u32,
        total_pairs: usize,
    },

    /// A pair row references a BD with no baseline row. Cannot happen when
    /// both tables come from the same aggregation pass.
    #[error("Pair ({bd_rep_id}, {sales_rep_id}) has no baseline row for its BD")]
    MissingBaseline {
        bd_rep_id: String,
        sales_rep_id: String,
    },
}
