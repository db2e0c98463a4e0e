//! Which policies a new claim may be filed against
//!
//! A policy is eligible while its effective status is Active. A policy in its
//! expiry window still qualifies; one past its end date does not, whatever
//! the server has stored.

use chrono::{DateTime, Utc};

use core_kernel::{PolicyId, Timezone};
use domain_policy::Policy;

use crate::error::ClaimValidationError;

pub fn is_eligible(policy: &Policy, now: DateTime<Utc>, timezone: Timezone) -> bool {
    policy.effective_status_in(now, timezone).is_active()
}

/// The policies a claim picker should offer, in their original order
pub fn eligible_policies(policies: &[Policy], now: DateTime<Utc>) -> Vec<&Policy> {
    eligible_policies_in(policies, now, Timezone::default())
}

pub fn eligible_policies_in(
    policies: &[Policy],
    now: DateTime<Utc>,
    timezone: Timezone,
) -> Vec<&Policy> {
    policies
        .iter()
        .filter(|policy| is_eligible(policy, now, timezone))
        .collect()
}

/// Finds `policy_id` among `policies` and checks it may take a new claim
///
/// An id the caller does not know about is treated the same as an inactive
/// policy.
pub fn ensure_eligible(
    policy_id: PolicyId,
    policies: &[Policy],
    now: DateTime<Utc>,
    timezone: Timezone,
) -> Result<&Policy, ClaimValidationError> {
    policies
        .iter()
        .find(|policy| policy.policy_id == policy_id)
        .filter(|policy| is_eligible(policy, now, timezone))
        .ok_or(ClaimValidationError::PolicyNotEligible(policy_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use core_kernel::UserId;
    use domain_policy::{PolicyStatus, PolicyType};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap()
    }

    fn policy(id: i64, status: PolicyStatus, days_left: i64) -> Policy {
        let today = now().date_naive();
        Policy {
            policy_id: PolicyId::new(id),
            user_id: UserId::new(1),
            insurer: "Acme".to_string(),
            policy_type: PolicyType::Motor,
            premium_amt: dec!(500),
            start_date: today - Duration::days(365),
            end_date: today + Duration::days(days_left),
            status,
        }
    }

    #[test]
    fn test_picker_offers_active_including_expiring() {
        let policies = vec![
            policy(1, PolicyStatus::Active, 200),
            policy(2, PolicyStatus::Active, 5),
            policy(3, PolicyStatus::Active, 0),
            policy(4, PolicyStatus::Cancelled, 200),
            policy(5, PolicyStatus::Lapsed, 200),
        ];
        let ids: Vec<i64> = eligible_policies(&policies, now())
            .into_iter()
            .map(|p| p.policy_id.get())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_ensure_eligible_unknown_policy() {
        let policies = vec![policy(1, PolicyStatus::Active, 200)];
        assert_eq!(
            ensure_eligible(PolicyId::new(9), &policies, now(), Timezone::default()),
            Err(ClaimValidationError::PolicyNotEligible(PolicyId::new(9)))
        );
    }

    #[test]
    fn test_ensure_eligible_expired_active_flag() {
        let policies = vec![policy(1, PolicyStatus::Active, -3)];
        let err = ensure_eligible(PolicyId::new(1), &policies, now(), Timezone::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Selected policy is not active");
    }
}
