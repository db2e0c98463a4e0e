//! Claims domain errors

use core_kernel::PolicyId;
use thiserror::Error;

/// Reasons a claim draft is refused before it reaches the repository
///
/// The display strings are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimValidationError {
    #[error("Please fill in all required fields")]
    MissingRequiredField(&'static str),

    #[error("Claim amount must be greater than 0")]
    NonPositiveAmount,

    #[error("Description must be at least 10 characters long")]
    DescriptionTooShort { length: usize },

    #[error("Description must not exceed 200 characters")]
    DescriptionTooLong { length: usize },

    #[error("Selected policy is not active")]
    PolicyNotEligible(PolicyId),

    #[error("Policy cannot be changed on an existing claim")]
    PolicyReassigned { from: PolicyId, to: PolicyId },
}

impl ClaimValidationError {
    pub fn missing(field: &'static str) -> Self {
        ClaimValidationError::MissingRequiredField(field)
    }

    /// The field that failed, when the failure is about a single field
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ClaimValidationError::MissingRequiredField(field) => Some(field),
            ClaimValidationError::NonPositiveAmount => Some("claimAmt"),
            ClaimValidationError::DescriptionTooShort { .. }
            | ClaimValidationError::DescriptionTooLong { .. } => Some("description"),
            ClaimValidationError::PolicyNotEligible(_)
            | ClaimValidationError::PolicyReassigned { .. } => Some("policyId"),
        }
    }
}
