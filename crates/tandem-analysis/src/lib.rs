//! Pairing performance scoring engine.
//!
//! Derives per-pairing metrics from raw opportunity records, normalizes them
//! against each BD's own baseline, composes a confidence-weighted score,
//! classifies pairings into percentile tiers, and generates per-BD routing
//! recommendations. Invoked as a single batch transform over a static
//! snapshot; see [`pipeline::ScoringPipeline`].

pub mod metrics;
pub mod pipeline;
pub mod recommend;
pub mod scoring;
pub mod stats;
pub mod summary;
pub mod validation;

pub use pipeline::{RunDiagnostics, ScoringPipeline, ScoringRun};
