//! Metric row types. Field names are a stable column contract read by
//! downstream chart consumers; renaming one is a breaking change.

use serde::{Deserialize, Serialize};

/// Raw counts and rates for one observed (BD, Sales) pairing.
///
/// Counts satisfy `total_open + total_closed_won + total_closed_lost =
/// total_opps` and `total_decided = total_closed_won + total_closed_lost`.
/// Rates are percentages in [0, 100], 0 by convention when the denominator
/// is 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairMetrics {
    pub bd_rep_id: String,
    pub sales_rep_id: String,
    pub total_opps: u32,
    pub total_open: u32,
    pub total_closed_won: u32,
    pub total_closed_lost: u32,
    pub total_decided: u32,
    pub win_rate_pct: f64,
    pub early_death_rate_pct: f64,
    pub stale_rate_pct: f64,
    pub avg_deal_size: f64,
}

/// A BD's own aggregate metrics across all its opportunities, regardless of
/// counterpart. The reference point every pairing deviation is measured
/// against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BdBaseline {
    pub bd_rep_id: String,
    pub total_opps: u32,
    pub win_rate_pct: f64,
    pub early_death_rate_pct: f64,
    pub stale_rate_pct: f64,
    pub avg_deal_size: f64,
}

/// A pairing's metrics augmented with its BD's baseline values and the
/// percentage deviation from each.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedPairMetrics {
    #[serde(flatten)]
    pub metrics: PairMetrics,
    pub bd_avg_win_rate_pct: f64,
    pub bd_avg_early_death_rate_pct: f64,
    pub bd_avg_stale_rate_pct: f64,
    pub bd_avg_deal_size: f64,
    pub win_rate_deviation_pct: f64,
    pub early_death_deviation_pct: f64,
    pub stale_rate_deviation_pct: f64,
    pub deal_size_deviation_pct: f64,
}
