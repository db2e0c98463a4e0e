//! Pre-built Test Fixtures
//!
//! Consistent, predictable data for unit tests. Everything is relative to
//! [`fixed_now`] so expiry arithmetic stays stable.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use core_kernel::{FixedClock, PolicyId, UserId};
use domain_claims::ClaimDraft;
use domain_policy::{Policy, PolicyDraft, PolicyStatus, PolicyType};
use rust_decimal_macros::dec;

/// 2024-06-01 10:00 UTC
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
}

pub fn fixed_clock() -> FixedClock {
    FixedClock(fixed_now())
}

/// `days` calendar days after the date of [`fixed_now`]
pub fn days_from_now(days: i64) -> NaiveDate {
    fixed_now().date_naive() + Duration::days(days)
}

/// Fixture for policy test data
pub struct PolicyFixtures;

impl PolicyFixtures {
    /// Owner used by the fixtures
    pub fn owner() -> UserId {
        UserId::new(1)
    }

    /// Complete, valid draft
    pub fn acme_health_draft() -> PolicyDraft {
        PolicyDraft::new(
            "Acme",
            PolicyType::Health,
            dec!(100),
            days_from_now(-30),
            days_from_now(335),
        )
    }

    /// A draft whose end date precedes its start date
    pub fn acme_end_before_start() -> PolicyDraft {
        PolicyDraft::new(
            "Acme",
            PolicyType::Health,
            dec!(100),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        )
    }

    /// Stored policy that is Active and ends `days_left` days from now
    pub fn active_ending_in(id: i64, days_left: i64) -> Policy {
        Policy {
            policy_id: PolicyId::new(id),
            user_id: Self::owner(),
            insurer: "Acme".to_string(),
            policy_type: PolicyType::Motor,
            premium_amt: dec!(450),
            start_date: days_from_now(days_left - 365),
            end_date: days_from_now(days_left),
            status: PolicyStatus::Active,
        }
    }
}

/// Fixture for claim test data
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// `{policyId: 5, claimAmt: 200, description: "Car accident on highway"}`
    pub fn highway_draft() -> ClaimDraft {
        ClaimDraft::new(PolicyId::new(5), dec!(200), "Car accident on highway")
    }
}
