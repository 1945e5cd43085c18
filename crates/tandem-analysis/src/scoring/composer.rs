//! Weighted score composition and the sample-size confidence discount.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tandem_core::config::ScoringConfig;

use crate::metrics::NormalizedPairMetrics;

/// A composed score awaiting classification. The classifier turns this into
/// the final `PerformanceScore` once global thresholds are known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPair {
    pub metrics: NormalizedPairMetrics,
    pub win_rate_weighted_score: f64,
    pub early_death_weighted_score: f64,
    pub stale_pipeline_weighted_score: f64,
    pub deal_size_weighted_score: f64,
    pub total_weighted_score: f64,
    pub confidence_multiplier: f64,
    pub final_performance_score: f64,
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

/// Compose the weighted score for every pair row.
///
/// Rows are independent, so composition runs data-parallel; input order is
/// preserved, so output stays in the aggregator's key order.
pub fn compose(rows: Vec<NormalizedPairMetrics>, config: &ScoringConfig) -> Vec<ScoredPair> {
    rows.into_par_iter()
        .map(|row| compose_row(row, config))
        .collect()
}

fn compose_row(row: NormalizedPairMetrics, config: &ScoringConfig) -> ScoredPair {
    let weights = &config.weights;

    // Higher win rate and deal size are good; higher early-death and stale
    // rates are bad, so those two deviations are negated before weighting.
    let win_rate_weighted_score = row.win_rate_deviation_pct * weights.win_rate;
    let early_death_weighted_score = -row.early_death_deviation_pct * weights.early_death;
    let stale_pipeline_weighted_score = -row.stale_rate_deviation_pct * weights.stale_pipeline;
    let deal_size_weighted_score = row.deal_size_deviation_pct * weights.deal_size;
    let total_weighted_score = win_rate_weighted_score
        + early_death_weighted_score
        + stale_pipeline_weighted_score
        + deal_size_weighted_score;

    // Linear discount toward zero below the confidence threshold.
    let confidence_multiplier =
        (row.metrics.total_opps as f64 / config.confidence_threshold as f64).min(1.0);
    let final_performance_score = total_weighted_score * confidence_multiplier;

    let threshold = config.flag_threshold_pct;
    let strength_high_win_rate = row.win_rate_deviation_pct > threshold;
    let strength_low_early_death = row.early_death_deviation_pct < -threshold;
    let strength_low_stale = row.stale_rate_deviation_pct < -threshold;
    let strength_high_deal_size = row.deal_size_deviation_pct > threshold;
    let concern_low_win_rate = row.win_rate_deviation_pct < -threshold;
    let concern_high_early_death = row.early_death_deviation_pct > threshold;
    let concern_high_stale = row.stale_rate_deviation_pct > threshold;
    let concern_low_deal_size = row.deal_size_deviation_pct < -threshold;

    let total_strengths = [
        strength_high_win_rate,
        strength_low_early_death,
        strength_low_stale,
        strength_high_deal_size,
    ]
    .iter()
    .filter(|&&flag| flag)
    .count() as u32;
    let total_concerns = [
        concern_low_win_rate,
        concern_high_early_death,
        concern_high_stale,
        concern_low_deal_size,
    ]
    .iter()
    .filter(|&&flag| flag)
    .count() as u32;

    ScoredPair {
        metrics: row,
        win_rate_weighted_score,
        early_death_weighted_score,
        stale_pipeline_weighted_score,
        deal_size_weighted_score,
        total_weighted_score,
        confidence_multiplier,
        final_performance_score,
        strength_high_win_rate,
        strength_low_early_death,
        strength_low_stale,
        strength_high_deal_size,
        concern_low_win_rate,
        concern_high_early_death,
        concern_high_stale,
        concern_low_deal_size,
        total_strengths,
        total_concerns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::PairMetrics;

    fn row(total_opps: u32, win_dev: f64, early_dev: f64, stale_dev: f64, deal_dev: f64) -> NormalizedPairMetrics {
        NormalizedPairMetrics {
            metrics: PairMetrics {
                bd_rep_id: "BD_001".to_string(),
                sales_rep_id: "SR_001".to_string(),
                total_opps,
                total_open: 0,
                total_closed_won: total_opps,
                total_closed_lost: 0,
                total_decided: total_opps,
                win_rate_pct: 100.0,
                early_death_rate_pct: 0.0,
                stale_rate_pct: 0.0,
                avg_deal_size: 50_000.0,
            },
            bd_avg_win_rate_pct: 50.0,
            bd_avg_early_death_rate_pct: 20.0,
            bd_avg_stale_rate_pct: 10.0,
            bd_avg_deal_size: 50_000.0,
            win_rate_deviation_pct: win_dev,
            early_death_deviation_pct: early_dev,
            stale_rate_deviation_pct: stale_dev,
            deal_size_deviation_pct: deal_dev,
        }
    }

    #[test]
    fn test_bad_metrics_subtract_from_score() {
        let scored = compose(vec![row(7, 40.0, 40.0, 40.0, 40.0)], &ScoringConfig::default());
        let pair = &scored[0];
        assert!((pair.win_rate_weighted_score - 10.0).abs() < 1e-9);
        assert!((pair.early_death_weighted_score - -10.0).abs() < 1e-9);
        assert!((pair.stale_pipeline_weighted_score - -10.0).abs() < 1e-9);
        assert!((pair.deal_size_weighted_score - 10.0).abs() < 1e-9);
        assert!(pair.total_weighted_score.abs() < 1e-9);
    }

    #[test]
    fn test_confidence_discount_below_threshold() {
        let scored = compose(
            vec![row(3, 40.0, 0.0, 0.0, 0.0), row(7, 40.0, 0.0, 0.0, 0.0), row(14, 40.0, 0.0, 0.0, 0.0)],
            &ScoringConfig::default(),
        );
        assert!((scored[0].confidence_multiplier - 3.0 / 7.0).abs() < 1e-9);
        assert!((scored[1].confidence_multiplier - 1.0).abs() < 1e-9);
        // Caps at 1.0 past the threshold.
        assert!((scored[2].confidence_multiplier - 1.0).abs() < 1e-9);
        assert!((scored[0].final_performance_score - 10.0 * 3.0 / 7.0).abs() < 1e-9);
        assert!((scored[1].final_performance_score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_flags_are_sign_aware() {
        let scored = compose(vec![row(7, 25.0, -25.0, 25.0, -25.0)], &ScoringConfig::default());
        let pair = &scored[0];
        assert!(pair.strength_high_win_rate);
        assert!(pair.strength_low_early_death);
        assert!(!pair.strength_low_stale);
        assert!(!pair.strength_high_deal_size);
        assert!(!pair.concern_low_win_rate);
        assert!(!pair.concern_high_early_death);
        assert!(pair.concern_high_stale);
        assert!(pair.concern_low_deal_size);
        assert_eq!(pair.total_strengths, 2);
        assert_eq!(pair.total_concerns, 2);
    }

    #[test]
    fn test_flag_threshold_is_exclusive() {
        let scored = compose(vec![row(7, 20.0, -20.0, 20.0, -20.0)], &ScoringConfig::default());
        let pair = &scored[0];
        assert_eq!(pair.total_strengths, 0);
        assert_eq!(pair.total_concerns, 0);
    }

    #[test]
    fn test_custom_weights() {
        let mut config = ScoringConfig::default();
        config.weights.win_rate = 1.0;
        config.weights.early_death = 0.0;
        config.weights.stale_pipeline = 0.0;
        config.weights.deal_size = 0.0;
        let scored = compose(vec![row(7, 30.0, 99.0, 99.0, 99.0)], &config);
        assert!((scored[0].total_weighted_score - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_order_preserved() {
        let rows: Vec<NormalizedPairMetrics> = (1..=20)
            .map(|i| {
                let mut r = row(i, i as f64, 0.0, 0.0, 0.0);
                r.metrics.sales_rep_id = format!("SR_{i:03}");
                r
            })
            .collect();
        let scored = compose(rows, &ScoringConfig::default());
        let ids: Vec<&str> = scored.iter().map(|s| s.metrics.metrics.sales_rep_id.as_str()).collect();
        let expected: Vec<String> = (1..=20).map(|i| format!("SR_{i:03}")).collect();
        assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
