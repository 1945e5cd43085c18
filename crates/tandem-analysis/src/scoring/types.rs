//! Scored pair rows and the seven-tier classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metrics::NormalizedPairMetrics;

/// Performance tier assigned to every scored pairing.
///
/// Serialized forms are the labels downstream consumers read verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Fewer than the minimum sample of opportunities; score is noise.
    #[serde(rename = "Insufficient Data")]
    InsufficientData,
    /// Confidence multiplier below the cutoff.
    #[serde(rename = "Low Confidence")]
    LowConfidence,
    /// At or above the 75th percentile.
    #[serde(rename = "High Performer")]
    HighPerformer,
    /// At or above the 50th percentile.
    #[serde(rename = "Above Average")]
    AboveAverage,
    /// At or above the 25th percentile.
    Average,
    /// At or above the 10th percentile.
    #[serde(rename = "Below Average")]
    BelowAverage,
    /// Below the 10th percentile.
    #[serde(rename = "At-Risk")]
    AtRisk,
}

impl Classification {
    /// All seven labels, best to worst, guards first.
    pub const ALL: [Classification; 7] = [
        Self::InsufficientData,
        Self::LowConfidence,
        Self::HighPerformer,
        Self::AboveAverage,
        Self::Average,
        Self::BelowAverage,
        Self::AtRisk,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::InsufficientData => "Insufficient Data",
            Self::LowConfidence => "Low Confidence",
            Self::HighPerformer => "High Performer",
            Self::AboveAverage => "Above Average",
            Self::Average => "Average",
            Self::BelowAverage => "Below Average",
            Self::AtRisk => "At-Risk",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Global score thresholds computed over the qualifying population.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PercentileThresholds {
    pub percentile_10th: f64,
    pub percentile_25th: f64,
    pub percentile_50th: f64,
    pub percentile_75th: f64,
}

/// The final scored, classified row for one pairing. Computed once per run
/// and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceScore {
    #[serde(flatten)]
    pub metrics: NormalizedPairMetrics,
    pub win_rate_weighted_score: f64,
    pub early_death_weighted_score: f64,
    pub stale_pipeline_weighted_score: f64,
    pub deal_size_weighted_score: f64,
    pub total_weighted_score: f64,
    pub confidence_multiplier: f64,
    pub final_performance_score: f64,
    pub performance_classification: Classification,
    pub percentile_10th: f64,
    pub percentile_25th: f64,
    pub percentile_50th: f64,
    pub percentile_75th: f64,
    pub strength_high_win_rate: bool,
    pub strength_low_early_death: bool,
    pub strength_low_stale: bool,
    pub strength_high_deal_size: bool,
    pub concern_low_win_rate: bool,
    pub concern_high_early_death: bool,
    pub concern_high_stale: bool,
    pub concern_low_deal_size: bool,
    pub total_strengths: u32,
    pub total_concerns: u32,
}

impl PerformanceScore {
    pub fn bd_rep_id(&self) -> &str {
        &self.metrics.metrics.bd_rep_id
    }

    pub fn sales_rep_id(&self) -> &str {
        &self.metrics.metrics.sales_rep_id
    }

    pub fn total_opps(&self) -> u32 {
        self.metrics.metrics.total_opps
    }
}
