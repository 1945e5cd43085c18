//! Error handling for Tandem.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod pipeline_error;
pub mod validation_error;

pub use config_error::ConfigError;
pub use pipeline_error::PipelineError;
pub use validation_error::ValidationError;
