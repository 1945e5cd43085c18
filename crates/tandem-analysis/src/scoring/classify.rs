//! Global percentile thresholds and tier assignment.
//!
//! Thresholds are computed over pairings with at least `min_sample_size`
//! opportunities so low-sample noise cannot distort the distribution, then
//! broadcast onto every row (including excluded ones) for traceability.

use tandem_core::config::ScoringConfig;
use tandem_core::errors::PipelineError;
use tracing::info;

use crate::stats;

use super::composer::ScoredPair;
use super::types::{Classification, PercentileThresholds, PerformanceScore};

/// Compute the global 10th/25th/50th/75th percentile thresholds of
/// `final_performance_score` over the qualifying population.
///
/// Errors with `NoQualifyingPairs` when no pairing reaches the minimum
/// sample size; the caller reports that instead of classifying anything.
pub fn compute_thresholds(
    scored: &[ScoredPair],
    config: &ScoringConfig,
) -> Result<PercentileThresholds, PipelineError> {
    let qualifying: Vec<f64> = scored
        .iter()
        .filter(|pair| pair.metrics.metrics.total_opps >= config.min_sample_size)
        .map(|pair| pair.final_performance_score)
        .collect();

    if qualifying.is_empty() {
        return Err(PipelineError::NoQualifyingPairs {
            min_sample_size: config.min_sample_size,
            total_pairs: scored.len(),
        });
    }

    let sorted = stats::sorted_ascending(&qualifying);
    let thresholds = PercentileThresholds {
        percentile_10th: stats::percentile(&sorted, 10.0),
        percentile_25th: stats::percentile(&sorted, 25.0),
        percentile_50th: stats::percentile(&sorted, 50.0),
        percentile_75th: stats::percentile(&sorted, 75.0),
    };

    info!(
        qualifying = qualifying.len(),
        p10 = thresholds.percentile_10th,
        p25 = thresholds.percentile_25th,
        p50 = thresholds.percentile_50th,
        p75 = thresholds.percentile_75th,
        "computed percentile thresholds"
    );

    Ok(thresholds)
}

/// Assign every scored pair its classification and the broadcast thresholds.
pub fn classify(
    scored: Vec<ScoredPair>,
    thresholds: PercentileThresholds,
    config: &ScoringConfig,
) -> Vec<PerformanceScore> {
    scored
        .into_iter()
        .map(|pair| {
            let classification = classify_pair(&pair, &thresholds, config);
            PerformanceScore {
                metrics: pair.metrics,
                win_rate_weighted_score: pair.win_rate_weighted_score,
                early_death_weighted_score: pair.early_death_weighted_score,
                stale_pipeline_weighted_score: pair.stale_pipeline_weighted_score,
                deal_size_weighted_score: pair.deal_size_weighted_score,
                total_weighted_score: pair.total_weighted_score,
                confidence_multiplier: pair.confidence_multiplier,
                final_performance_score: pair.final_performance_score,
                performance_classification: classification,
                percentile_10th: thresholds.percentile_10th,
                percentile_25th: thresholds.percentile_25th,
                percentile_50th: thresholds.percentile_50th,
                percentile_75th: thresholds.percentile_75th,
                strength_high_win_rate: pair.strength_high_win_rate,
                strength_low_early_death: pair.strength_low_early_death,
                strength_low_stale: pair.strength_low_stale,
                strength_high_deal_size: pair.strength_high_deal_size,
                concern_low_win_rate: pair.concern_low_win_rate,
                concern_high_early_death: pair.concern_high_early_death,
                concern_high_stale: pair.concern_high_stale,
                concern_low_deal_size: pair.concern_low_deal_size,
                total_strengths: pair.total_strengths,
                total_concerns: pair.total_concerns,
            }
        })
        .collect()
}

/// Priority-ordered classification guards.
///
/// Both guards run before any percentile comparison: the sample-size guard
/// catches 0-2 opportunities first, then the confidence guard catches
/// pairings whose multiplier sits below the cutoff.
fn classify_pair(
    pair: &ScoredPair,
    thresholds: &PercentileThresholds,
    config: &ScoringConfig,
) -> Classification {
    if pair.metrics.metrics.total_opps < config.min_sample_size {
        Classification::InsufficientData
    } else if pair.confidence_multiplier < config.low_confidence_cutoff {
        Classification::LowConfidence
    } else if pair.final_performance_score >= thresholds.percentile_75th {
        Classification::HighPerformer
    } else if pair.final_performance_score >= thresholds.percentile_50th {
        Classification::AboveAverage
    } else if pair.final_performance_score >= thresholds.percentile_25th {
        Classification::Average
    } else if pair.final_performance_score >= thresholds.percentile_10th {
        Classification::BelowAverage
    } else {
        Classification::AtRisk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{NormalizedPairMetrics, PairMetrics};
    use crate::scoring::composer::compose;

    fn row(sr: &str, total_opps: u32, win_dev: f64) -> NormalizedPairMetrics {
        NormalizedPairMetrics {
            metrics: PairMetrics {
                bd_rep_id: "BD_001".to_string(),
                sales_rep_id: sr.to_string(),
                total_opps,
                total_open: total_opps,
                total_closed_won: 0,
                total_closed_lost: 0,
                total_decided: 0,
                win_rate_pct: 0.0,
                early_death_rate_pct: 0.0,
                stale_rate_pct: 0.0,
                avg_deal_size: 50_000.0,
            },
            bd_avg_win_rate_pct: 50.0,
            bd_avg_early_death_rate_pct: 0.0,
            bd_avg_stale_rate_pct: 0.0,
            bd_avg_deal_size: 50_000.0,
            win_rate_deviation_pct: win_dev,
            early_death_deviation_pct: 0.0,
            stale_rate_deviation_pct: 0.0,
            deal_size_deviation_pct: 0.0,
        }
    }

    fn scored(rows: Vec<NormalizedPairMetrics>) -> Vec<ScoredPair> {
        compose(rows, &ScoringConfig::default())
    }

    #[test]
    fn test_no_qualifying_pairs_is_error() {
        let pairs = scored(vec![row("SR_001", 2, 10.0), row("SR_002", 1, 20.0)]);
        assert!(matches!(
            compute_thresholds(&pairs, &ScoringConfig::default()),
            Err(PipelineError::NoQualifyingPairs { total_pairs: 2, .. })
        ));
    }

    #[test]
    fn test_thresholds_exclude_low_sample_pairs() {
        // Nine qualifying rows with scores 10..90, one huge low-sample row
        // that must not move the distribution.
        let mut rows: Vec<NormalizedPairMetrics> = (1..=9)
            .map(|i| row(&format!("SR_{i:03}"), 7, (i * 40) as f64))
            .collect();
        rows.push(row("SR_OUT", 2, 100_000.0));
        let pairs = scored(rows);
        let thresholds = compute_thresholds(&pairs, &ScoringConfig::default()).unwrap();
        // Scores are 10..90; median of the nine qualifying rows is 50.
        assert!((thresholds.percentile_50th - 50.0).abs() < 1e-9);
        assert!((thresholds.percentile_75th - 70.0).abs() < 1e-9);
        assert!((thresholds.percentile_25th - 30.0).abs() < 1e-9);
        assert!((thresholds.percentile_10th - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_insufficient_data_overrides_score() {
        let pairs = scored(vec![row("SR_001", 7, 40.0), row("SR_002", 2, 100_000.0)]);
        let thresholds = compute_thresholds(&pairs, &ScoringConfig::default()).unwrap();
        let classified = classify(pairs, thresholds, &ScoringConfig::default());
        let outlier = classified
            .iter()
            .find(|score| score.sales_rep_id() == "SR_002")
            .unwrap();
        assert_eq!(
            outlier.performance_classification,
            Classification::InsufficientData
        );
    }

    #[test]
    fn test_low_confidence_at_minimum_sample() {
        // total_opps = 3 gives multiplier 3/7 ~= 0.4286 < 0.43.
        let pairs = scored(vec![row("SR_001", 7, 40.0), row("SR_002", 3, 90.0)]);
        let thresholds = compute_thresholds(&pairs, &ScoringConfig::default()).unwrap();
        let classified = classify(pairs, thresholds, &ScoringConfig::default());
        let low = classified
            .iter()
            .find(|score| score.sales_rep_id() == "SR_002")
            .unwrap();
        assert_eq!(low.performance_classification, Classification::LowConfidence);
    }

    #[test]
    fn test_tiers_cover_score_range() {
        let rows: Vec<NormalizedPairMetrics> = (1..=20)
            .map(|i| row(&format!("SR_{i:03}"), 7, (i * 10) as f64))
            .collect();
        let pairs = scored(rows);
        let config = ScoringConfig::default();
        let thresholds = compute_thresholds(&pairs, &config).unwrap();
        let classified = classify(pairs, thresholds, &config);

        let top = classified.last().unwrap();
        assert_eq!(top.performance_classification, Classification::HighPerformer);
        let bottom = classified.first().unwrap();
        assert_eq!(bottom.performance_classification, Classification::AtRisk);
        // Every row got exactly one of the seven labels.
        for score in &classified {
            assert!(Classification::ALL.contains(&score.performance_classification));
        }
    }

    #[test]
    fn test_thresholds_broadcast_to_excluded_rows() {
        let pairs = scored(vec![row("SR_001", 7, 40.0), row("SR_002", 1, 0.0)]);
        let config = ScoringConfig::default();
        let thresholds = compute_thresholds(&pairs, &config).unwrap();
        let classified = classify(pairs, thresholds, &config);
        for score in &classified {
            assert!((score.percentile_75th - thresholds.percentile_75th).abs() < 1e-12);
            assert!((score.percentile_10th - thresholds.percentile_10th).abs() < 1e-12);
        }
    }
}
