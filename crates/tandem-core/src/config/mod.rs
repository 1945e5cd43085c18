//! Configuration for the scoring pipeline.

pub mod scoring_config;

pub use scoring_config::{MetricWeights, ScoringConfig};
