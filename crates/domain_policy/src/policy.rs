//! Policy record, its enumerations, and the editable draft

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::wire::{calendar_date, decimal_number};
use core_kernel::{PolicyId, Timezone, UserId};

use crate::error::PolicyValidationError;
use crate::status::{effective_status_in, EffectiveStatus};
use crate::validation::PolicyValidator;

/// Line of business
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyType {
    Life,
    Health,
    Motor,
    Home,
    Travel,
}

impl PolicyType {
    pub const ALL: [PolicyType; 5] = [
        PolicyType::Life,
        PolicyType::Health,
        PolicyType::Motor,
        PolicyType::Home,
        PolicyType::Travel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyType::Life => "Life",
            PolicyType::Health => "Health",
            PolicyType::Motor => "Motor",
            PolicyType::Home => "Home",
            PolicyType::Travel => "Travel",
        }
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PolicyType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown policy type: {}", s))
    }
}

/// Administrative status as stored by the server
///
/// Distinct from the display status, which also accounts for the end date.
/// See [`crate::status`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyStatus {
    #[default]
    Active,
    Lapsed,
    Cancelled,
}

impl PolicyStatus {
    pub const ALL: [PolicyStatus; 3] = [
        PolicyStatus::Active,
        PolicyStatus::Lapsed,
        PolicyStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::Active => "Active",
            PolicyStatus::Lapsed => "Lapsed",
            PolicyStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PolicyStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown policy status: {}", s))
    }
}

/// A policy as held by the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Assigned by the repository on creation
    pub policy_id: PolicyId,
    /// Owner reference
    pub user_id: UserId,
    pub insurer: String,
    pub policy_type: PolicyType,
    #[serde(with = "decimal_number")]
    pub premium_amt: Decimal,
    #[serde(with = "calendar_date")]
    pub start_date: NaiveDate,
    #[serde(with = "calendar_date")]
    pub end_date: NaiveDate,
    pub status: PolicyStatus,
}

impl Policy {
    /// Builds the stored record the repository would return for a submission
    pub fn from_submission(policy_id: PolicyId, submission: PolicySubmission) -> Self {
        Self {
            policy_id,
            user_id: submission.user_id,
            insurer: submission.insurer,
            policy_type: submission.policy_type,
            premium_amt: submission.premium_amt,
            start_date: submission.start_date,
            end_date: submission.end_date,
            status: submission.status,
        }
    }

    /// Prefills an edit draft from this record
    pub fn to_draft(&self) -> PolicyDraft {
        PolicyDraft {
            insurer: self.insurer.clone(),
            policy_type: Some(self.policy_type),
            premium_amt: Some(self.premium_amt),
            start_date: Some(self.start_date),
            end_date: Some(self.end_date),
            status: self.status,
        }
    }

    /// Display status at `now`, anchoring dates in UTC
    pub fn effective_status(&self, now: DateTime<Utc>) -> EffectiveStatus {
        self.effective_status_in(now, Timezone::default())
    }

    /// Display status at `now`, anchoring dates in `timezone`
    pub fn effective_status_in(&self, now: DateTime<Utc>, timezone: Timezone) -> EffectiveStatus {
        effective_status_in(self.status, self.end_date, now, timezone)
    }
}

/// Editable, possibly incomplete policy
///
/// Missing inputs are `None` and an empty insurer is an empty string; the
/// validator decides what is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyDraft {
    pub insurer: String,
    pub policy_type: Option<PolicyType>,
    pub premium_amt: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Defaults to Active
    pub status: PolicyStatus,
}

impl PolicyDraft {
    /// A fully populated draft with the default status
    pub fn new(
        insurer: impl Into<String>,
        policy_type: PolicyType,
        premium_amt: Decimal,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            insurer: insurer.into(),
            policy_type: Some(policy_type),
            premium_amt: Some(premium_amt),
            start_date: Some(start_date),
            end_date: Some(end_date),
            status: PolicyStatus::Active,
        }
    }

    pub fn with_status(mut self, status: PolicyStatus) -> Self {
        self.status = status;
        self
    }

    /// Validates the draft and attaches the owner
    ///
    /// # Errors
    ///
    /// Returns the first failing rule, see [`PolicyValidator::validate`].
    pub fn into_submission(self, user_id: UserId) -> Result<PolicySubmission, PolicyValidationError> {
        PolicyValidator::validate(&self)?;

        match (self.policy_type, self.premium_amt, self.start_date, self.end_date) {
            (Some(policy_type), Some(premium_amt), Some(start_date), Some(end_date)) => {
                Ok(PolicySubmission {
                    user_id,
                    insurer: self.insurer.trim().to_string(),
                    policy_type,
                    premium_amt,
                    start_date,
                    end_date,
                    status: self.status,
                })
            }
            _ => Err(PolicyValidationError::MissingRequiredField("policyType")),
        }
    }
}

/// Request body for creating or updating a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySubmission {
    pub user_id: UserId,
    pub insurer: String,
    pub policy_type: PolicyType,
    #[serde(with = "decimal_number")]
    pub premium_amt: Decimal,
    #[serde(with = "calendar_date")]
    pub start_date: NaiveDate,
    #[serde(with = "calendar_date")]
    pub end_date: NaiveDate,
    pub status: PolicyStatus,
}
