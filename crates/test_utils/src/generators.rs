//! Property-Based Test Generators
//!
//! Proptest strategies that produce valid drafts, so properties can perturb a
//! single field and observe the one rule it breaks.

use chrono::{Duration, NaiveDate};
use core_kernel::PolicyId;
use domain_claims::ClaimDraft;
use domain_policy::{PolicyDraft, PolicyStatus, PolicyType};
use proptest::prelude::*;
use rust_decimal::Decimal;

pub fn policy_type_strategy() -> impl Strategy<Value = PolicyType> {
    prop_oneof![
        Just(PolicyType::Life),
        Just(PolicyType::Health),
        Just(PolicyType::Motor),
        Just(PolicyType::Home),
        Just(PolicyType::Travel),
    ]
}

pub fn policy_status_strategy() -> impl Strategy<Value = PolicyStatus> {
    prop_oneof![
        Just(PolicyStatus::Active),
        Just(PolicyStatus::Lapsed),
        Just(PolicyStatus::Cancelled),
    ]
}

/// Insurer names with no surrounding whitespace
pub fn insurer_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,12}( Mutual| Insurance| Assurance)?"
}

/// Positive amounts with two decimal places
pub fn positive_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Ordered (start, end) pairs between 2000 and roughly 2060
pub fn date_range_strategy() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
    (0i64..20_000i64, 1i64..3_650i64).prop_map(|(offset, length)| {
        let base = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let start = base + Duration::days(offset);
        (start, start + Duration::days(length))
    })
}

/// Policy drafts that pass every rule
pub fn valid_policy_draft_strategy() -> impl Strategy<Value = PolicyDraft> {
    (
        insurer_strategy(),
        policy_type_strategy(),
        positive_amount_strategy(),
        date_range_strategy(),
        policy_status_strategy(),
    )
        .prop_map(|(insurer, policy_type, premium, (start, end), status)| {
            PolicyDraft::new(insurer, policy_type, premium, start, end).with_status(status)
        })
}

/// Descriptions of an acceptable length, any printable content
pub fn valid_description_strategy() -> impl Strategy<Value = String> {
    "\\PC{10,200}"
}

/// Claim drafts that pass every rule
pub fn valid_claim_draft_strategy() -> impl Strategy<Value = ClaimDraft> {
    (1i64..1_000i64, positive_amount_strategy(), valid_description_strategy())
        .prop_map(|(policy, amount, description)| {
            ClaimDraft::new(PolicyId::new(policy), amount, description)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_claims::validate_claim_draft;
    use domain_policy::validate_policy_draft;

    proptest! {
        #[test]
        fn generated_policy_drafts_are_valid(draft in valid_policy_draft_strategy()) {
            prop_assert!(validate_policy_draft(&draft).is_ok());
        }

        #[test]
        fn generated_claim_drafts_are_valid(draft in valid_claim_draft_strategy()) {
            prop_assert!(validate_claim_draft(&draft).is_ok());
        }
    }
}
