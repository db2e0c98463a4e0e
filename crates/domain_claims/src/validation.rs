//! Claim draft validation
//!
//! # Validation Rules
//!
//! Checked in order, first failure wins:
//!
//! 1. policy, amount and description are all present
//! 2. amount is greater than zero
//! 3. description has at least [`DESCRIPTION_MIN_CHARS`] characters
//! 4. description has at most [`DESCRIPTION_MAX_CHARS`] characters
//!
//! Length is counted in characters, not bytes, and the description is not
//! trimmed first.

use rust_decimal::Decimal;

use crate::claim::{Claim, ClaimDraft};
use crate::error::ClaimValidationError;

pub const DESCRIPTION_MIN_CHARS: usize = 10;
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// Validator for claim drafts
pub struct ClaimValidator;

impl ClaimValidator {
    /// Checks a draft against the claim rules
    pub fn validate(draft: &ClaimDraft) -> Result<(), ClaimValidationError> {
        if draft.policy_id.is_none() {
            return Err(ClaimValidationError::missing("policyId"));
        }
        let amount = draft
            .claim_amt
            .ok_or(ClaimValidationError::missing("claimAmt"))?;
        if draft.description.is_empty() {
            return Err(ClaimValidationError::missing("description"));
        }

        if amount <= Decimal::ZERO {
            return Err(ClaimValidationError::NonPositiveAmount);
        }

        let length = draft.description.chars().count();
        if length < DESCRIPTION_MIN_CHARS {
            return Err(ClaimValidationError::DescriptionTooShort { length });
        }
        if length > DESCRIPTION_MAX_CHARS {
            return Err(ClaimValidationError::DescriptionTooLong { length });
        }

        Ok(())
    }

    /// Checks an edit of `current`: the draft rules, then that the claim
    /// still points at the same policy
    pub fn validate_edit(current: &Claim, draft: &ClaimDraft) -> Result<(), ClaimValidationError> {
        Self::validate(draft)?;

        match draft.policy_id {
            Some(to) if to != current.policy_id => Err(ClaimValidationError::PolicyReassigned {
                from: current.policy_id,
                to,
            }),
            _ => Ok(()),
        }
    }
}

/// Free-function form of [`ClaimValidator::validate`]
pub fn validate_claim_draft(draft: &ClaimDraft) -> Result<(), ClaimValidationError> {
    ClaimValidator::validate(draft)
}

/// Free-function form of [`ClaimValidator::validate_edit`]
pub fn validate_claim_edit(current: &Claim, draft: &ClaimDraft) -> Result<(), ClaimValidationError> {
    ClaimValidator::validate_edit(current, draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_kernel::{ClaimId, PolicyId, UserId};
    use rust_decimal_macros::dec;

    use crate::claim::ClaimStatus;

    fn draft() -> ClaimDraft {
        ClaimDraft::new(PolicyId::new(5), dec!(200), "Car accident on highway")
    }

    #[test]
    fn test_valid_draft() {
        assert!(validate_claim_draft(&draft()).is_ok());
    }

    #[test]
    fn test_missing_fields_in_order() {
        let empty = ClaimDraft::default();
        assert_eq!(
            validate_claim_draft(&empty),
            Err(ClaimValidationError::MissingRequiredField("policyId"))
        );

        let mut no_amount = draft();
        no_amount.claim_amt = None;
        assert_eq!(
            validate_claim_draft(&no_amount).unwrap_err().field(),
            Some("claimAmt")
        );

        let mut no_description = draft();
        no_description.description.clear();
        assert_eq!(
            validate_claim_draft(&no_description),
            Err(ClaimValidationError::MissingRequiredField("description"))
        );
    }

    #[test]
    fn test_amount_checked_before_description() {
        let mut d = draft();
        d.claim_amt = Some(Decimal::ZERO);
        d.description = "short".to_string();
        assert_eq!(validate_claim_draft(&d), Err(ClaimValidationError::NonPositiveAmount));
    }

    #[test]
    fn test_length_counts_characters() {
        // ten multi-byte characters
        let mut d = draft();
        d.description = "éééééééééé".to_string();
        assert!(validate_claim_draft(&d).is_ok());
    }

    #[test]
    fn test_whitespace_counts_towards_length() {
        let mut d = draft();
        d.description = " ".repeat(10);
        assert!(validate_claim_draft(&d).is_ok());
    }

    #[test]
    fn test_edit_rejects_policy_change() {
        let current = Claim {
            claim_id: ClaimId::new(1),
            policy_id: PolicyId::new(5),
            user_id: UserId::new(3),
            claim_amt: dec!(200),
            description: "Car accident on highway".to_string(),
            status: ClaimStatus::Submitted,
            submitted_at: Utc::now(),
        };

        let mut moved = draft();
        moved.policy_id = Some(PolicyId::new(6));
        let err = validate_claim_edit(&current, &moved).unwrap_err();
        assert_eq!(err.to_string(), "Policy cannot be changed on an existing claim");

        let mut amended = draft();
        amended.claim_amt = Some(dec!(250));
        assert!(validate_claim_edit(&current, &amended).is_ok());
    }
}
