//! Descriptive statistics over the validated input table.
//!
//! Nothing here feeds the score; the summary exists so a run's log line and
//! output carry the shape of the data that produced it.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tandem_core::types::collections::FxHashSet;
use tandem_core::types::{Opportunity, Outcome};

/// Shape of the opportunity table a run was scored from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    pub total_bds: usize,
    pub total_sales_reps: usize,
    pub total_pairings: usize,
    pub total_open: usize,
    pub total_closed_won: usize,
    pub total_closed_lost: usize,
    /// Min and max `created_date`; `None` for an empty table.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub min_deal_value: f64,
    pub max_deal_value: f64,
    pub avg_deal_value: f64,
}

/// Summarize the opportunity table.
pub fn summarize(opportunities: &[Opportunity]) -> DatasetSummary {
    let mut bds: FxHashSet<&str> = FxHashSet::default();
    let mut sales_reps: FxHashSet<&str> = FxHashSet::default();
    let mut pairings: FxHashSet<(&str, &str)> = FxHashSet::default();
    let mut total_open = 0usize;
    let mut total_closed_won = 0usize;
    let mut total_closed_lost = 0usize;
    let mut date_range: Option<(NaiveDate, NaiveDate)> = None;
    let mut min_deal_value = f64::INFINITY;
    let mut max_deal_value = f64::NEG_INFINITY;
    let mut deal_value_sum = 0.0;

    for opp in opportunities {
        bds.insert(&opp.bd_rep_id);
        sales_reps.insert(&opp.sales_rep_id);
        pairings.insert((&opp.bd_rep_id, &opp.sales_rep_id));
        match opp.outcome {
            Outcome::Open => total_open += 1,
            Outcome::ClosedWon => total_closed_won += 1,
            Outcome::ClosedLost => total_closed_lost += 1,
        }
        date_range = Some(match date_range {
            None => (opp.created_date, opp.created_date),
            Some((min, max)) => (min.min(opp.created_date), max.max(opp.created_date)),
        });
        min_deal_value = min_deal_value.min(opp.deal_value);
        max_deal_value = max_deal_value.max(opp.deal_value);
        deal_value_sum += opp.deal_value;
    }

    let total_records = opportunities.len();
    DatasetSummary {
        total_records,
        total_bds: bds.len(),
        total_sales_reps: sales_reps.len(),
        total_pairings: pairings.len(),
        total_open,
        total_closed_won,
        total_closed_lost,
        date_range,
        min_deal_value: if total_records == 0 { 0.0 } else { min_deal_value },
        max_deal_value: if total_records == 0 { 0.0 } else { max_deal_value },
        avg_deal_value: if total_records == 0 {
            0.0
        } else {
            deal_value_sum / total_records as f64
        },
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DatasetSummary {{ records={}, bds={}, sales_reps={}, pairings={}, open={}, won={}, lost={}, avg_deal=${:.0} }}",
            self.total_records,
            self.total_bds,
            self.total_sales_reps,
            self.total_pairings,
            self.total_open,
            self.total_closed_won,
            self.total_closed_lost,
            self.avg_deal_value,
        )
    }
}
