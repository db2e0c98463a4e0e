//! Policy draft validation
//!
//! # Validation Rules
//!
//! Checked in order; the first failure is reported and nothing after it is
//! evaluated.
//!
//! 1. insurer, policy type, premium, start date and end date are all present
//!    (a blank insurer counts as missing)
//! 2. premium is greater than zero
//! 3. start date is strictly before end date

use rust_decimal::Decimal;

use crate::error::PolicyValidationError;
use crate::policy::PolicyDraft;

/// Validator for policy drafts
pub struct PolicyValidator;

impl PolicyValidator {
    /// Checks a draft against the policy rules
    ///
    /// # Errors
    ///
    /// The first failing rule as a [`PolicyValidationError`].
    pub fn validate(draft: &PolicyDraft) -> Result<(), PolicyValidationError> {
        Self::require_fields(draft)?;

        if let Some(premium) = draft.premium_amt {
            if premium <= Decimal::ZERO {
                return Err(PolicyValidationError::NonPositivePremium);
            }
        }

        if let (Some(start), Some(end)) = (draft.start_date, draft.end_date) {
            if start >= end {
                return Err(PolicyValidationError::EndNotAfterStart { start, end });
            }
        }

        Ok(())
    }

    fn require_fields(draft: &PolicyDraft) -> Result<(), PolicyValidationError> {
        if draft.insurer.trim().is_empty() {
            return Err(PolicyValidationError::missing("insurer"));
        }
        if draft.policy_type.is_none() {
            return Err(PolicyValidationError::missing("policyType"));
        }
        if draft.premium_amt.is_none() {
            return Err(PolicyValidationError::missing("premiumAmt"));
        }
        if draft.start_date.is_none() {
            return Err(PolicyValidationError::missing("startDate"));
        }
        if draft.end_date.is_none() {
            return Err(PolicyValidationError::missing("endDate"));
        }
        Ok(())
    }
}

/// Free-function form of [`PolicyValidator::validate`]
pub fn validate_policy_draft(draft: &PolicyDraft) -> Result<(), PolicyValidationError> {
    PolicyValidator::validate(draft)
}
