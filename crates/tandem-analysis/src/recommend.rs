//! Per-BD routing recommendations.
//!
//! Best/worst counterpart selection uses each BD's own 75th/25th score
//! percentiles within its qualifying pairings. That per-BD statistical
//! context is distinct from the global thresholds the classifier uses, but
//! both go through the same shared percentile utility.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tandem_core::config::ScoringConfig;
use tandem_core::types::collections::FxHashMap;
use tracing::debug;

use crate::scoring::PerformanceScore;
use crate::stats;

/// Counterpart lists are capped at five entries each.
pub const MAX_COUNTERPARTS: usize = 5;

/// Routing guidance for one BD: which counterparts to prefer and avoid.
///
/// With few qualifying pairings the 75th/25th percentiles can span nearly
/// the whole set, so the two lists may overlap. Accepted behavior, not
/// special-cased.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub bd_rep_id: String,
    /// Qualifying pairings (at least `min_sample_size` opportunities).
    pub total_pairings: u32,
    /// The BD's mean final score across qualifying pairings.
    pub avg_performance_score: f64,
    /// Counterparts at or above the BD's own 75th percentile, best first.
    pub best_counterparts: SmallVec<[String; 5]>,
    /// Counterparts at or below the BD's own 25th percentile, worst first.
    pub worst_counterparts: SmallVec<[String; 5]>,
    pub best_avg_score: Option<f64>,
    pub worst_avg_score: Option<f64>,
    pub num_best: u32,
    pub num_worst: u32,
}

/// Generate one recommendation per BD with at least one qualifying pairing.
/// BDs with none are omitted entirely. Output is sorted by BD identifier.
pub fn generate(scores: &[PerformanceScore], config: &ScoringConfig) -> Vec<Recommendation> {
    let mut by_bd: FxHashMap<&str, Vec<&PerformanceScore>> = FxHashMap::default();
    for score in scores {
        if score.total_opps() >= config.min_sample_size {
            by_bd.entry(score.bd_rep_id()).or_default().push(score);
        }
    }

    let mut recommendations: Vec<Recommendation> = by_bd
        .into_iter()
        .map(|(bd_rep_id, pairings)| recommend_for_bd(bd_rep_id, pairings))
        .collect();
    recommendations.sort_by(|a, b| a.bd_rep_id.cmp(&b.bd_rep_id));

    debug!(bds = recommendations.len(), "generated recommendations");
    recommendations
}

fn recommend_for_bd(bd_rep_id: &str, mut pairings: Vec<&PerformanceScore>) -> Recommendation {
    let sorted_scores =
        stats::sorted_ascending(&pairings.iter().map(|p| p.final_performance_score).collect::<Vec<_>>());
    let own_p75 = stats::percentile(&sorted_scores, 75.0);
    let own_p25 = stats::percentile(&sorted_scores, 25.0);

    // Ascending by score, counterpart id as the stable tie-break.
    pairings.sort_by(|a, b| {
        a.final_performance_score
            .partial_cmp(&b.final_performance_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.sales_rep_id().cmp(b.sales_rep_id()))
    });

    let worst: Vec<&&PerformanceScore> = pairings
        .iter()
        .filter(|p| p.final_performance_score <= own_p25)
        .take(MAX_COUNTERPARTS)
        .collect();
    let best: Vec<&&PerformanceScore> = pairings
        .iter()
        .rev()
        .filter(|p| p.final_performance_score >= own_p75)
        .take(MAX_COUNTERPARTS)
        .collect();

    let best_scores: Vec<f64> = best.iter().map(|p| p.final_performance_score).collect();
    let worst_scores: Vec<f64> = worst.iter().map(|p| p.final_performance_score).collect();

    Recommendation {
        bd_rep_id: bd_rep_id.to_string(),
        total_pairings: pairings.len() as u32,
        avg_performance_score: stats::mean(&sorted_scores),
        best_counterparts: best.iter().map(|p| p.sales_rep_id().to_string()).collect(),
        worst_counterparts: worst.iter().map(|p| p.sales_rep_id().to_string()).collect(),
        best_avg_score: (!best_scores.is_empty()).then(|| stats::mean(&best_scores)),
        worst_avg_score: (!worst_scores.is_empty()).then(|| stats::mean(&worst_scores)),
        num_best: best.len() as u32,
        num_worst: worst.len() as u32,
    }
}
