//! Input table row types and shared collections.

pub mod collections;
pub mod opportunity;

pub use opportunity::{Opportunity, Outcome, PairKey};
