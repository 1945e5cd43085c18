//! Scoring configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Per-metric weights applied to baseline deviations.
///
/// The four metrics are weighted equally by default. Weights are applied to
/// deviation percentages, so they need not sum to 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricWeights {
    pub win_rate: f64,
    pub early_death: f64,
    pub stale_pipeline: f64,
    pub deal_size: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            win_rate: 0.25,
            early_death: 0.25,
            stale_pipeline: 0.25,
            deal_size: 0.25,
        }
    }
}

/// Configuration for a scoring run.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`TANDEM_*`)
/// 2. Project config (`tandem.toml` in the given root)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: MetricWeights,
    /// Opportunity count at which a pairing's score carries full weight.
    pub confidence_threshold: u32,
    /// Minimum opportunities for a pairing to enter percentile computation
    /// and recommendations.
    pub min_sample_size: u32,
    /// Confidence multiplier below which a pairing is labeled Low Confidence.
    pub low_confidence_cutoff: f64,
    /// A loss abandoned within this many days of entering its last stage
    /// counts as an early death.
    pub early_death_max_days: u32,
    /// An open opportunity in its current stage longer than this many days
    /// counts as stale.
    pub stale_min_days: u32,
    /// Deviation magnitude (percentage points) beyond which a strength or
    /// concern flag is set.
    pub flag_threshold_pct: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: MetricWeights::default(),
            confidence_threshold: 7,
            min_sample_size: 3,
            low_confidence_cutoff: 0.43,
            early_death_max_days: 14,
            stale_min_days: 90,
            flag_threshold_pct: 20.0,
        }
    }
}

impl ScoringConfig {
    /// Load configuration with layered resolution.
    ///
    /// Missing `tandem.toml` is not an error; unknown keys are silently
    /// ignored (forward-compatible).
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join("tandem.toml");
        if project_config_path.exists() {
            config = Self::from_toml_file(&project_config_path)?;
            tracing::debug!(path = %project_config_path.display(), "loaded project config");
        }

        Self::apply_env_overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply environment variable overrides.
    /// Pattern: `TANDEM_CONFIDENCE_THRESHOLD`, `TANDEM_MIN_SAMPLE_SIZE`, etc.
    fn apply_env_overrides(config: &mut ScoringConfig) {
        if let Ok(val) = std::env::var("TANDEM_CONFIDENCE_THRESHOLD") {
            if let Ok(v) = val.parse::<u32>() {
                config.confidence_threshold = v;
            }
        }
        if let Ok(val) = std::env::var("TANDEM_MIN_SAMPLE_SIZE") {
            if let Ok(v) = val.parse::<u32>() {
                config.min_sample_size = v;
            }
        }
        if let Ok(val) = std::env::var("TANDEM_LOW_CONFIDENCE_CUTOFF") {
            if let Ok(v) = val.parse::<f64>() {
                config.low_confidence_cutoff = v;
            }
        }
        if let Ok(val) = std::env::var("TANDEM_FLAG_THRESHOLD_PCT") {
            if let Ok(v) = val.parse::<f64>() {
                config.flag_threshold_pct = v;
            }
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, weight) in [
            ("weights.win_rate", self.weights.win_rate),
            ("weights.early_death", self.weights.early_death),
            ("weights.stale_pipeline", self.weights.stale_pipeline),
            ("weights.deal_size", self.weights.deal_size),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be finite and non-negative".to_string(),
                });
            }
        }
        if self.confidence_threshold == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "confidence_threshold".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.min_sample_size == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "min_sample_size".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.low_confidence_cutoff) {
            return Err(ConfigError::ValidationFailed {
                field: "low_confidence_cutoff".to_string(),
                message: "must be between 0.0 and 1.0".to_string(),
            });
        }
        if !self.flag_threshold_pct.is_finite() || self.flag_threshold_pct <= 0.0 {
            return Err(ConfigError::ValidationFailed {
                field: "flag_threshold_pct".to_string(),
                message: "must be a positive number".to_string(),
            });
        }
        Ok(())
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
