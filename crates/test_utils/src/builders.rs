//! Test Data Builders
//!
//! Builders with sensible defaults so tests only spell out the fields they
//! care about.

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{ClaimId, PolicyId, UserId};
use domain_claims::{Claim, ClaimStatus};
use domain_policy::{Policy, PolicyStatus, PolicyType};
use fake::faker::company::en::CompanyName;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::{days_from_now, fixed_now, PolicyFixtures};

/// Builder for stored policies
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    policy: Policy,
}

impl Default for PolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyBuilder {
    /// Active Health policy with a year left to run
    pub fn new() -> Self {
        Self {
            policy: Policy {
                policy_id: PolicyId::new(1),
                user_id: PolicyFixtures::owner(),
                insurer: "Acme".to_string(),
                policy_type: PolicyType::Health,
                premium_amt: dec!(1200),
                start_date: days_from_now(-30),
                end_date: days_from_now(335),
                status: PolicyStatus::Active,
            },
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.policy.policy_id = PolicyId::new(id);
        self
    }

    pub fn with_owner(mut self, user_id: UserId) -> Self {
        self.policy.user_id = user_id;
        self
    }

    pub fn with_insurer(mut self, insurer: impl Into<String>) -> Self {
        self.policy.insurer = insurer.into();
        self
    }

    /// Uses a generated company name as insurer
    pub fn with_fake_insurer(mut self) -> Self {
        self.policy.insurer = CompanyName().fake();
        self
    }

    pub fn with_type(mut self, policy_type: PolicyType) -> Self {
        self.policy.policy_type = policy_type;
        self
    }

    pub fn with_premium(mut self, premium: Decimal) -> Self {
        self.policy.premium_amt = premium;
        self
    }

    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.policy.start_date = start;
        self.policy.end_date = end;
        self
    }

    /// Sets the end date relative to the fixture clock
    pub fn ending_in(mut self, days: i64) -> Self {
        self.policy.end_date = days_from_now(days);
        self
    }

    pub fn with_status(mut self, status: PolicyStatus) -> Self {
        self.policy.status = status;
        self
    }

    pub fn build(self) -> Policy {
        self.policy
    }
}

/// Builder for stored claims
#[derive(Debug, Clone)]
pub struct ClaimBuilder {
    claim: Claim,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimBuilder {
    pub fn new() -> Self {
        Self {
            claim: Claim {
                claim_id: ClaimId::new(1),
                policy_id: PolicyId::new(1),
                user_id: PolicyFixtures::owner(),
                claim_amt: dec!(200),
                description: "Car accident on highway".to_string(),
                status: ClaimStatus::Submitted,
                submitted_at: fixed_now(),
            },
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.claim.claim_id = ClaimId::new(id);
        self
    }

    pub fn against(mut self, policy_id: PolicyId) -> Self {
        self.claim.policy_id = policy_id;
        self
    }

    pub fn with_owner(mut self, user_id: UserId) -> Self {
        self.claim.user_id = user_id;
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.claim.claim_amt = amount;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.claim.description = description.into();
        self
    }

    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.claim.status = status;
        self
    }

    pub fn submitted_at(mut self, at: DateTime<Utc>) -> Self {
        self.claim.submitted_at = at;
        self
    }

    pub fn build(self) -> Claim {
        self.claim
    }
}
