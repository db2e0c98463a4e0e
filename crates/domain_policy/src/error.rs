//! Policy domain errors
//!
//! Display strings are the messages shown next to the form.

use chrono::NaiveDate;
use thiserror::Error;

/// Reasons a policy draft is rejected before it reaches the network
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyValidationError {
    /// A required field is empty; carries the first missing field's wire name
    #[error("Please fill in all required fields")]
    MissingRequiredField(&'static str),

    #[error("Premium amount must be greater than 0")]
    NonPositivePremium,

    #[error("End date must be after start date")]
    EndNotAfterStart {
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl PolicyValidationError {
    /// Creates a missing-field error
    pub fn missing(field: &'static str) -> Self {
        PolicyValidationError::MissingRequiredField(field)
    }
}
