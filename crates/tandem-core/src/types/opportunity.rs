//! The opportunity record, the single input table of the scoring pipeline.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Final disposition of an opportunity.
///
/// Serialized forms match the upstream CRM export verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Open,
    #[serde(rename = "Closed Won")]
    ClosedWon,
    #[serde(rename = "Closed Lost")]
    ClosedLost,
}

impl Outcome {
    /// True for Closed Won and Closed Lost.
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::Open)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::ClosedWon => "Closed Won",
            Self::ClosedLost => "Closed Lost",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single sales opportunity worked by a (BD, Sales) pairing.
///
/// Invariant: `closed_date` is `Some` iff the outcome is decided, and never
/// precedes `created_date`. Enforced by the validation stage before any
/// aggregation runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub opportunity_id: String,
    pub bd_rep_id: String,
    pub sales_rep_id: String,
    pub created_date: NaiveDate,
    pub closed_date: Option<NaiveDate>,
    pub outcome: Outcome,
    /// Current pipeline stage name, or the closed terminal state.
    pub current_stage: String,
    pub days_in_current_stage: u32,
    pub deal_value: f64,
}

impl Opportunity {
    /// The pairing this opportunity is attributed to.
    pub fn pair_key(&self) -> PairKey {
        PairKey {
            bd_rep_id: self.bd_rep_id.clone(),
            sales_rep_id: self.sales_rep_id.clone(),
        }
    }
}

/// Identifies a (BD, Sales) pairing.
///
/// A pairing exists only by observation: it enters the dataset the first time
/// an opportunity references it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    pub bd_rep_id: String,
    pub sales_rep_id: String,
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.bd_rep_id, self.sales_rep_id)
    }
}
