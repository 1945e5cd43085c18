//! Core types, errors, config, and tracing setup for the Tandem pairing
//! scorer.
//!
//! The engine itself lives in `tandem-analysis`; this crate holds everything
//! both the engine and its callers need to agree on.

pub mod config;
pub mod errors;
pub mod logging;
pub mod types;
