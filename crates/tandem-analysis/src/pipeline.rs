//! End-to-end scoring pipeline orchestrator.
//!
//! Stages run strictly forward: validate → summarize → aggregate →
//! normalize → compose → classify → recommend. Each stage's output is a new
//! table; nothing reaches back upstream or mutates an input.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tandem_core::config::ScoringConfig;
use tandem_core::errors::PipelineError;
use tandem_core::types::Opportunity;
use tracing::info;

use crate::metrics::{self, BdBaseline};
use crate::recommend::{self, Recommendation};
use crate::scoring::{self, Classification, PercentileThresholds, PerformanceScore};
use crate::summary::{self, DatasetSummary};
use crate::validation;

/// The batch scoring pipeline.
pub struct ScoringPipeline {
    config: ScoringConfig,
}

impl ScoringPipeline {
    /// Create a pipeline with the given configuration.
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Create a pipeline with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ScoringConfig::default())
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score a full opportunity snapshot.
    ///
    /// Fails fast on malformed input, and with
    /// [`PipelineError::NoQualifyingPairs`] when no pairing reaches the
    /// minimum sample size. There is no partial-result mode.
    pub fn run(&self, opportunities: &[Opportunity]) -> Result<ScoringRun, PipelineError> {
        validation::validate_opportunities(opportunities)?;

        let summary = summary::summarize(opportunities);
        info!(%summary, "input table validated");

        let (pair_metrics, baselines) = metrics::aggregate(opportunities, &self.config);
        let normalized = metrics::normalize(pair_metrics, &baselines)?;

        let scored = scoring::compose(normalized, &self.config);
        let thresholds = scoring::compute_thresholds(&scored, &self.config)?;
        let scores = scoring::classify(scored, thresholds, &self.config);

        let recommendations = recommend::generate(&scores, &self.config);

        let diagnostics =
            RunDiagnostics::compute(&scores, &recommendations, thresholds, &self.config);
        info!(%diagnostics, "scoring run complete");

        Ok(ScoringRun {
            summary,
            baselines,
            scores,
            recommendations,
            thresholds,
            diagnostics,
        })
    }
}

/// Everything a scoring run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringRun {
    /// Shape of the input table.
    pub summary: DatasetSummary,
    /// One baseline row per observed BD.
    pub baselines: Vec<BdBaseline>,
    /// One scored, classified row per observed pairing, in key order. The
    /// flattened row carries the full pair-metrics-with-deviations columns.
    pub scores: Vec<PerformanceScore>,
    /// One row per BD with at least one qualifying pairing, in BD order.
    pub recommendations: Vec<Recommendation>,
    /// Global thresholds the classifications were cut against.
    pub thresholds: PercentileThresholds,
    pub diagnostics: RunDiagnostics,
}

/// Descriptive counts over a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDiagnostics {
    /// Observed pairings.
    pub total_pairs: usize,
    /// Pairings that entered threshold computation.
    pub qualifying_pairs: usize,
    /// Pairings below the minimum sample size.
    pub excluded_pairs: usize,
    pub bd_count: usize,
    pub recommendation_count: usize,
    /// Rows per classification label.
    pub classification_counts: HashMap<Classification, usize>,
    pub thresholds: PercentileThresholds,
}

impl RunDiagnostics {
    fn compute(
        scores: &[PerformanceScore],
        recommendations: &[Recommendation],
        thresholds: PercentileThresholds,
        config: &ScoringConfig,
    ) -> Self {
        let total_pairs = scores.len();
        let qualifying_pairs = scores
            .iter()
            .filter(|score| score.total_opps() >= config.min_sample_size)
            .count();

        let mut classification_counts: HashMap<Classification, usize> = HashMap::new();
        let mut bds: std::collections::HashSet<&str> = std::collections::HashSet::new();
        for score in scores {
            *classification_counts
                .entry(score.performance_classification)
                .or_insert(0) += 1;
            bds.insert(score.bd_rep_id());
        }

        Self {
            total_pairs,
            qualifying_pairs,
            excluded_pairs: total_pairs - qualifying_pairs,
            bd_count: bds.len(),
            recommendation_count: recommendations.len(),
            classification_counts,
            thresholds,
        }
    }
}

impl fmt::Display for RunDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RunDiagnostics {{ pairs={}, qualifying={}, excluded={}, bds={}, recommendations={}, p75={:.2}",
            self.total_pairs,
            self.qualifying_pairs,
            self.excluded_pairs,
            self.bd_count,
            self.recommendation_count,
            self.thresholds.percentile_75th,
        )?;
        for label in Classification::ALL {
            if let Some(count) = self.classification_counts.get(&label) {
                write!(f, ", {label}={count}")?;
            }
        }
        f.write_str(" }")
    }
}
