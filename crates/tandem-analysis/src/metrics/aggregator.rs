//! Single-pass aggregation of opportunities into pair and BD metric rows.

use tandem_core::config::ScoringConfig;
use tandem_core::types::collections::FxHashMap;
use tandem_core::types::{Opportunity, Outcome, PairKey};
use tracing::debug;

use super::types::{BdBaseline, PairMetrics};

/// Running counters for one pairing or one BD.
#[derive(Debug, Default, Clone)]
struct MetricAccumulator {
    total: u32,
    open: u32,
    won: u32,
    lost: u32,
    /// Losses abandoned within the early-death window.
    early_losses: u32,
    /// Open opportunities past the stale window.
    stale_open: u32,
    deal_value_sum: f64,
}

impl MetricAccumulator {
    fn observe(&mut self, opp: &Opportunity, config: &ScoringConfig) {
        self.total += 1;
        self.deal_value_sum += opp.deal_value;
        match opp.outcome {
            Outcome::Open => {
                self.open += 1;
                if opp.days_in_current_stage > config.stale_min_days {
                    self.stale_open += 1;
                }
            }
            Outcome::ClosedWon => self.won += 1,
            Outcome::ClosedLost => {
                self.lost += 1;
                if opp.days_in_current_stage <= config.early_death_max_days {
                    self.early_losses += 1;
                }
            }
        }
    }

    fn decided(&self) -> u32 {
        self.won + self.lost
    }

    fn win_rate_pct(&self) -> f64 {
        pct(self.won, self.decided())
    }

    /// Early deaths as a share of losses.
    fn early_death_rate_pct(&self) -> f64 {
        pct(self.early_losses, self.lost)
    }

    /// Stale opens as a share of ALL opportunities, not just open ones.
    /// Asymmetric with the early-death denominator on purpose; downstream
    /// thresholds are calibrated against this exact arithmetic.
    fn stale_rate_pct(&self) -> f64 {
        pct(self.stale_open, self.total)
    }

    fn avg_deal_size(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.deal_value_sum / self.total as f64
        }
    }
}

/// Percentage with a zero-fill convention: 0 when the denominator is 0.
fn pct(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

/// Group opportunities by pairing and by BD, producing one `PairMetrics` row
/// per observed pairing and one `BdBaseline` row per observed BD.
///
/// Every observed key gets all counts defined (0 where an outcome never
/// occurred); a pairing with no decided opportunities or no losses yields
/// zero rates, never an error. Output rows are sorted by key for
/// reproducible downstream order.
pub fn aggregate(
    opportunities: &[Opportunity],
    config: &ScoringConfig,
) -> (Vec<PairMetrics>, Vec<BdBaseline>) {
    let mut pairs: FxHashMap<PairKey, MetricAccumulator> = FxHashMap::default();
    let mut bds: FxHashMap<String, MetricAccumulator> = FxHashMap::default();

    for opp in opportunities {
        pairs.entry(opp.pair_key()).or_default().observe(opp, config);
        bds.entry(opp.bd_rep_id.clone())
            .or_default()
            .observe(opp, config);
    }

    let mut pair_rows: Vec<PairMetrics> = pairs
        .into_iter()
        .map(|(key, acc)| PairMetrics {
            bd_rep_id: key.bd_rep_id,
            sales_rep_id: key.sales_rep_id,
            total_opps: acc.total,
            total_open: acc.open,
            total_closed_won: acc.won,
            total_closed_lost: acc.lost,
            total_decided: acc.decided(),
            win_rate_pct: acc.win_rate_pct(),
            early_death_rate_pct: acc.early_death_rate_pct(),
            stale_rate_pct: acc.stale_rate_pct(),
            avg_deal_size: acc.avg_deal_size(),
        })
        .collect();
    pair_rows.sort_by(|a, b| {
        (a.bd_rep_id.as_str(), a.sales_rep_id.as_str())
            .cmp(&(b.bd_rep_id.as_str(), b.sales_rep_id.as_str()))
    });

    let mut baseline_rows: Vec<BdBaseline> = bds
        .into_iter()
        .map(|(bd_rep_id, acc)| BdBaseline {
            bd_rep_id,
            total_opps: acc.total,
            win_rate_pct: acc.win_rate_pct(),
            early_death_rate_pct: acc.early_death_rate_pct(),
            stale_rate_pct: acc.stale_rate_pct(),
            avg_deal_size: acc.avg_deal_size(),
        })
        .collect();
    baseline_rows.sort_by(|a, b| a.bd_rep_id.cmp(&b.bd_rep_id));

    debug!(
        pairs = pair_rows.len(),
        bds = baseline_rows.len(),
        "aggregated opportunity table"
    );

    (pair_rows, baseline_rows)
}
