//! Fail-fast structural validation of the opportunity table.
//!
//! Runs before any aggregation; a single malformed record aborts the run.
//! Degenerate-but-valid data (all-open pairings, zero losses) is not an
//! error and is handled by the zero-fill policies in the aggregator.

use tandem_core::errors::ValidationError;
use tandem_core::types::collections::FxHashSet;
use tandem_core::types::{Opportunity, Outcome};

/// Validate the full opportunity table, returning the first violation found.
pub fn validate_opportunities(opportunities: &[Opportunity]) -> Result<(), ValidationError> {
    let mut seen_ids: FxHashSet<&str> = FxHashSet::default();

    for opp in opportunities {
        if opp.opportunity_id.is_empty() {
            return Err(ValidationError::EmptyField {
                opportunity_id: "<unknown>".to_string(),
                field: "opportunity_id",
            });
        }
        if opp.bd_rep_id.is_empty() {
            return Err(ValidationError::EmptyField {
                opportunity_id: opp.opportunity_id.clone(),
                field: "bd_rep_id",
            });
        }
        if opp.sales_rep_id.is_empty() {
            return Err(ValidationError::EmptyField {
                opportunity_id: opp.opportunity_id.clone(),
                field: "sales_rep_id",
            });
        }
        if !seen_ids.insert(opp.opportunity_id.as_str()) {
            return Err(ValidationError::DuplicateOpportunityId {
                opportunity_id: opp.opportunity_id.clone(),
            });
        }
        if !opp.deal_value.is_finite() || opp.deal_value <= 0.0 {
            return Err(ValidationError::NonPositiveDealValue {
                opportunity_id: opp.opportunity_id.clone(),
                deal_value: opp.deal_value,
            });
        }

        // closed_date is set iff the outcome is decided.
        match (opp.outcome, opp.closed_date) {
            (Outcome::Open, Some(_)) | (Outcome::ClosedWon, None) | (Outcome::ClosedLost, None) => {
                return Err(ValidationError::ClosedDateMismatch {
                    opportunity_id: opp.opportunity_id.clone(),
                    outcome: opp.outcome.name(),
                });
            }
            _ => {}
        }
        if let Some(closed_date) = opp.closed_date {
            if closed_date < opp.created_date {
                return Err(ValidationError::ClosedBeforeCreated {
                    opportunity_id: opp.opportunity_id.clone(),
                    created_date: opp.created_date,
                    closed_date,
                });
            }
        }
    }

    Ok(())
}
