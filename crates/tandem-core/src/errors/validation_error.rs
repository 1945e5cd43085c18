//! Fatal input-table validation errors.
//!
//! The pipeline validates the opportunity table before any aggregation and
//! refuses to score malformed data. Every variant names the offending record
//! so the caller can fix the export rather than chase a bad score.

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Duplicate opportunity_id: {opportunity_id}")]
    DuplicateOpportunityId { opportunity_id: String },

    #[error("Opportunity {opportunity_id} has an empty {field}")]
    EmptyField {
        opportunity_id: String,
        field: &'static str,
    },

    #[error("Opportunity {opportunity_id} has non-positive deal_value {deal_value}")]
    NonPositiveDealValue {
        opportunity_id: String,
        deal_value: f64,
    },

    #[error("Opportunity {opportunity_id} has a closed_date inconsistent with outcome {outcome}")]
    ClosedDateMismatch {
        opportunity_id: String,
        outcome: &'static str,
    },

    #[error("Opportunity {opportunity_id} closed before it was created ({closed_date} < {created_date})")]
    ClosedBeforeCreated {
        opportunity_id: String,
        created_date: chrono::NaiveDate,
        closed_date: chrono::NaiveDate,
    },
}
