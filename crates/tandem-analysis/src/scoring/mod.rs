//! Confidence-weighted score composition and percentile-tier classification.

pub mod classify;
pub mod composer;
pub mod types;

pub use classify::{classify, compute_thresholds};
pub use composer::{compose, ScoredPair};
pub use types::{Classification, PercentileThresholds, PerformanceScore};
