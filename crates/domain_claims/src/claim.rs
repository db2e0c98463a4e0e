//! Claim record, its status, and the editable draft

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::wire::decimal_number;
use core_kernel::{ClaimId, PolicyId, UserId};

use crate::error::ClaimValidationError;
use crate::validation::ClaimValidator;

/// Claim status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    /// Filed by the claimant, not yet picked up
    #[default]
    Submitted,
    #[serde(rename = "Under Review")]
    UnderReview,
    Approved,
    Rejected,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 4] = [
        ClaimStatus::Submitted,
        ClaimStatus::UnderReview,
        ClaimStatus::Approved,
        ClaimStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Submitted => "Submitted",
            ClaimStatus::UnderReview => "Under Review",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Rejected => "Rejected",
        }
    }

    /// True once an administrator has decided the claim
    pub fn is_final(&self) -> bool {
        matches!(self, ClaimStatus::Approved | ClaimStatus::Rejected)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ClaimStatus::ALL
            .into_iter()
            .find(|st| {
                st.as_str().eq_ignore_ascii_case(wanted)
                    || st.as_str().replace(' ', "").eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| format!("Unknown claim status: {}", s))
    }
}

/// A claim as held by the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub claim_id: ClaimId,
    /// The policy claimed against, fixed at creation
    pub policy_id: PolicyId,
    pub user_id: UserId,
    #[serde(with = "decimal_number")]
    pub claim_amt: Decimal,
    pub description: String,
    pub status: ClaimStatus,
    /// Set once at creation
    pub submitted_at: DateTime<Utc>,
}

impl Claim {
    /// Builds the stored record the repository would return for a submission
    pub fn from_submission(claim_id: ClaimId, submission: ClaimSubmission) -> Self {
        Self {
            claim_id,
            policy_id: submission.policy_id,
            user_id: submission.user_id,
            claim_amt: submission.claim_amt,
            description: submission.description,
            status: submission.status,
            submitted_at: submission.submitted_at,
        }
    }

    /// Prefills an edit draft from this record
    pub fn to_draft(&self) -> ClaimDraft {
        ClaimDraft {
            policy_id: Some(self.policy_id),
            claim_amt: Some(self.claim_amt),
            description: self.description.clone(),
        }
    }
}

/// Editable, possibly incomplete claim
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimDraft {
    pub policy_id: Option<PolicyId>,
    pub claim_amt: Option<Decimal>,
    pub description: String,
}

impl ClaimDraft {
    pub fn new(policy_id: PolicyId, claim_amt: Decimal, description: impl Into<String>) -> Self {
        Self {
            policy_id: Some(policy_id),
            claim_amt: Some(claim_amt),
            description: description.into(),
        }
    }

    /// Validates the draft and attaches the fields the claimant cannot edit
    ///
    /// # Errors
    ///
    /// Returns the first failing rule, see [`ClaimValidator::validate`].
    pub fn into_submission(
        self,
        user_id: UserId,
        status: ClaimStatus,
        submitted_at: DateTime<Utc>,
    ) -> Result<ClaimSubmission, ClaimValidationError> {
        ClaimValidator::validate(&self)?;

        match (self.policy_id, self.claim_amt) {
            (Some(policy_id), Some(claim_amt)) => Ok(ClaimSubmission {
                policy_id,
                user_id,
                claim_amt,
                description: self.description,
                status,
                submitted_at,
            }),
            (None, _) => Err(ClaimValidationError::missing("policyId")),
            (_, None) => Err(ClaimValidationError::missing("claimAmt")),
        }
    }
}

/// Request body for creating or updating a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSubmission {
    pub policy_id: PolicyId,
    pub user_id: UserId,
    #[serde(with = "decimal_number")]
    pub claim_amt: Decimal,
    pub description: String,
    pub status: ClaimStatus,
    pub submitted_at: DateTime<Utc>,
}
