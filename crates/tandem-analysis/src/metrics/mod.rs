//! Pair-level metric derivation: raw counts and rates per (BD, Sales)
//! pairing, per-BD baselines, and deviation normalization against them.

pub mod aggregator;
pub mod deviation;
pub mod types;

pub use aggregator::aggregate;
pub use deviation::normalize;
pub use types::{BdBaseline, NormalizedPairMetrics, PairMetrics};
