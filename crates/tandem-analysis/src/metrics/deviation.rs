//! Deviation of each pairing from its BD's own baseline.
//!
//! Deviations are relative to "how this BD does on average", not a global
//! average; the same counterpart can deviate very differently against two
//! different BDs.

use tandem_core::errors::PipelineError;
use tandem_core::types::collections::FxHashMap;

use super::types::{BdBaseline, NormalizedPairMetrics, PairMetrics};

/// Percentage deviation for a rate metric.
///
/// A zero baseline is replaced by a unit denominator rather than skipped,
/// keeping the deviation defined and bounded. This understates deviations
/// for BDs whose baseline rate is exactly zero; downstream percentiles are
/// calibrated against that exact behavior.
fn rate_deviation(pair_value: f64, baseline_value: f64) -> f64 {
    let denominator = if baseline_value == 0.0 { 1.0 } else { baseline_value };
    (pair_value - baseline_value) / denominator * 100.0
}

/// Percentage deviation for deal size. No unit-denominator substitution:
/// deal size is never legitimately zero, and any non-finite result
/// collapses to 0.
fn size_deviation(pair_value: f64, baseline_value: f64) -> f64 {
    let deviation = (pair_value - baseline_value) / baseline_value * 100.0;
    if deviation.is_finite() { deviation } else { 0.0 }
}

/// Augment each pair row with its BD's baseline values and the four
/// deviations. Row order is preserved.
pub fn normalize(
    pair_metrics: Vec<PairMetrics>,
    baselines: &[BdBaseline],
) -> Result<Vec<NormalizedPairMetrics>, PipelineError> {
    let by_bd: FxHashMap<&str, &BdBaseline> = baselines
        .iter()
        .map(|baseline| (baseline.bd_rep_id.as_str(), baseline))
        .collect();

    pair_metrics
        .into_iter()
        .map(|metrics| {
            let baseline = by_bd.get(metrics.bd_rep_id.as_str()).ok_or_else(|| {
                PipelineError::MissingBaseline {
                    bd_rep_id: metrics.bd_rep_id.clone(),
                    sales_rep_id: metrics.sales_rep_id.clone(),
                }
            })?;

            Ok(NormalizedPairMetrics {
                win_rate_deviation_pct: rate_deviation(
                    metrics.win_rate_pct,
                    baseline.win_rate_pct,
                ),
                early_death_deviation_pct: rate_deviation(
                    metrics.early_death_rate_pct,
                    baseline.early_death_rate_pct,
                ),
                stale_rate_deviation_pct: rate_deviation(
                    metrics.stale_rate_pct,
                    baseline.stale_rate_pct,
                ),
                deal_size_deviation_pct: size_deviation(
                    metrics.avg_deal_size,
                    baseline.avg_deal_size,
                ),
                bd_avg_win_rate_pct: baseline.win_rate_pct,
                bd_avg_early_death_rate_pct: baseline.early_death_rate_pct,
                bd_avg_stale_rate_pct: baseline.stale_rate_pct,
                bd_avg_deal_size: baseline.avg_deal_size,
                metrics,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(bd: &str, sr: &str, win: f64, early: f64, stale: f64, deal: f64) -> PairMetrics {
        PairMetrics {
            bd_rep_id: bd.to_string(),
            sales_rep_id: sr.to_string(),
            total_opps: 10,
            total_open: 2,
            total_closed_won: 4,
            total_closed_lost: 4,
            total_decided: 8,
            win_rate_pct: win,
            early_death_rate_pct: early,
            stale_rate_pct: stale,
            avg_deal_size: deal,
        }
    }

    fn baseline(bd: &str, win: f64, early: f64, stale: f64, deal: f64) -> BdBaseline {
        BdBaseline {
            bd_rep_id: bd.to_string(),
            total_opps: 40,
            win_rate_pct: win,
            early_death_rate_pct: early,
            stale_rate_pct: stale,
            avg_deal_size: deal,
        }
    }

    #[test]
    fn test_deviation_from_baseline() {
        let rows = normalize(
            vec![pair("BD_001", "SR_001", 60.0, 10.0, 5.0, 55_000.0)],
            &[baseline("BD_001", 40.0, 20.0, 10.0, 50_000.0)],
        )
        .unwrap();
        let row = &rows[0];
        assert!((row.win_rate_deviation_pct - 50.0).abs() < 1e-9);
        assert!((row.early_death_deviation_pct - -50.0).abs() < 1e-9);
        assert!((row.stale_rate_deviation_pct - -50.0).abs() < 1e-9);
        assert!((row.deal_size_deviation_pct - 10.0).abs() < 1e-9);
        assert!((row.bd_avg_win_rate_pct - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_baseline_uses_unit_denominator() {
        let rows = normalize(
            vec![pair("BD_001", "SR_001", 30.0, 0.0, 0.0, 50_000.0)],
            &[baseline("BD_001", 0.0, 0.0, 0.0, 50_000.0)],
        )
        .unwrap();
        let row = &rows[0];
        // (30 - 0) / 1 * 100, not a skip and not an infinity.
        assert!((row.win_rate_deviation_pct - 3_000.0).abs() < 1e-9);
        assert_eq!(row.early_death_deviation_pct, 0.0);
        assert_eq!(row.stale_rate_deviation_pct, 0.0);
    }

    #[test]
    fn test_matching_baseline_yields_zero_deviation() {
        let rows = normalize(
            vec![pair("BD_001", "SR_001", 40.0, 20.0, 10.0, 50_000.0)],
            &[baseline("BD_001", 40.0, 20.0, 10.0, 50_000.0)],
        )
        .unwrap();
        let row = &rows[0];
        assert_eq!(row.win_rate_deviation_pct, 0.0);
        assert_eq!(row.early_death_deviation_pct, 0.0);
        assert_eq!(row.stale_rate_deviation_pct, 0.0);
        assert_eq!(row.deal_size_deviation_pct, 0.0);
    }

    #[test]
    fn test_missing_baseline_is_error() {
        let result = normalize(
            vec![pair("BD_001", "SR_001", 40.0, 20.0, 10.0, 50_000.0)],
            &[baseline("BD_999", 40.0, 20.0, 10.0, 50_000.0)],
        );
        assert!(matches!(
            result,
            Err(PipelineError::MissingBaseline { bd_rep_id, .. }) if bd_rep_id == "BD_001"
        ));
    }
}
