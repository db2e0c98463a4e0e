//! Tests for policy draft validation
//!
//! Covers rule ordering, boundary values, and the submission conversion.

use chrono::{Duration, NaiveDate};
use core_kernel::UserId;
use domain_policy::{
    validate_policy_draft, PolicyDraft, PolicyStatus, PolicyType, PolicyValidationError,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn complete_draft() -> PolicyDraft {
    PolicyDraft::new("Acme", PolicyType::Health, dec!(100), date(2024, 1, 1), date(2025, 1, 1))
}

mod required_fields {
    use super::*;

    #[test]
    fn test_empty_draft_reports_insurer_first() {
        assert_eq!(
            validate_policy_draft(&PolicyDraft::default()),
            Err(PolicyValidationError::MissingRequiredField("insurer"))
        );
    }

    #[test]
    fn test_each_missing_field_is_named() {
        let cases: Vec<(&str, Box<dyn Fn(&mut PolicyDraft)>)> = vec![
            ("insurer", Box::new(|d: &mut PolicyDraft| d.insurer.clear())),
            ("policyType", Box::new(|d: &mut PolicyDraft| d.policy_type = None)),
            ("premiumAmt", Box::new(|d: &mut PolicyDraft| d.premium_amt = None)),
            ("startDate", Box::new(|d: &mut PolicyDraft| d.start_date = None)),
            ("endDate", Box::new(|d: &mut PolicyDraft| d.end_date = None)),
        ];

        for (field, clear) in cases {
            let mut draft = complete_draft();
            clear(&mut draft);
            assert_eq!(
                validate_policy_draft(&draft),
                Err(PolicyValidationError::MissingRequiredField(field)),
                "field {}",
                field
            );
        }
    }

    #[test]
    fn test_missing_message_matches_form_copy() {
        let err = validate_policy_draft(&PolicyDraft::default()).unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all required fields");
    }
}

mod premium {
    use super::*;

    #[test]
    fn test_negative_premium_rejected() {
        let mut draft = complete_draft();
        draft.premium_amt = Some(dec!(-0.01));
        let err = validate_policy_draft(&draft).unwrap_err();
        assert_eq!(err, PolicyValidationError::NonPositivePremium);
        assert_eq!(err.to_string(), "Premium amount must be greater than 0");
    }

    #[test]
    fn test_smallest_positive_premium_accepted() {
        let mut draft = complete_draft();
        draft.premium_amt = Some(dec!(0.01));
        assert!(validate_policy_draft(&draft).is_ok());
    }

    #[test]
    fn test_premium_checked_before_dates() {
        let mut draft = complete_draft();
        draft.premium_amt = Some(Decimal::ZERO);
        draft.end_date = Some(date(2020, 1, 1));
        assert_eq!(
            validate_policy_draft(&draft),
            Err(PolicyValidationError::NonPositivePremium)
        );
    }
}

mod dates {
    use super::*;

    #[test]
    fn test_end_before_start_scenario() {
        let draft = PolicyDraft::new(
            "Acme",
            PolicyType::Health,
            dec!(100),
            date(2024, 1, 1),
            date(2023, 1, 1),
        );
        let err = validate_policy_draft(&draft).unwrap_err();
        assert_eq!(
            err,
            PolicyValidationError::EndNotAfterStart {
                start: date(2024, 1, 1),
                end: date(2023, 1, 1),
            }
        );
        assert_eq!(err.to_string(), "End date must be after start date");
    }

    #[test]
    fn test_one_day_policy_accepted() {
        let mut draft = complete_draft();
        draft.end_date = Some(date(2024, 1, 2));
        assert!(validate_policy_draft(&draft).is_ok());
    }
}

mod submission {
    use super::*;

    #[test]
    fn test_submission_carries_status_and_owner() {
        let submission = complete_draft()
            .with_status(PolicyStatus::Cancelled)
            .into_submission(UserId::new(4))
            .unwrap();
        assert_eq!(submission.status, PolicyStatus::Cancelled);
        assert_eq!(submission.user_id, UserId::new(4));
        assert_eq!(submission.premium_amt, dec!(100));
    }

    #[test]
    fn test_invalid_draft_never_becomes_submission() {
        let mut draft = complete_draft();
        draft.premium_amt = Some(dec!(-1));
        assert!(draft.into_submission(UserId::new(4)).is_err());
    }
}

proptest! {
    #[test]
    fn prop_positive_premium_and_ordered_dates_pass(
        cents in 1i64..100_000_000i64,
        start_offset in 0i64..20_000i64,
        length in 1i64..5_000i64,
    ) {
        let start = date(1990, 1, 1) + Duration::days(start_offset);
        let draft = PolicyDraft::new(
            "Insurer",
            PolicyType::Travel,
            Decimal::new(cents, 2),
            start,
            start + Duration::days(length),
        );
        prop_assert!(validate_policy_draft(&draft).is_ok());
    }

    #[test]
    fn prop_non_positive_premium_fails(cents in -100_000_000i64..=0i64) {
        let mut draft = complete_draft();
        draft.premium_amt = Some(Decimal::new(cents, 2));
        prop_assert_eq!(
            validate_policy_draft(&draft),
            Err(PolicyValidationError::NonPositivePremium)
        );
    }

    #[test]
    fn prop_end_not_after_start_fails(back in 0i64..5_000i64) {
        let mut draft = complete_draft();
        let start = date(2024, 1, 1);
        draft.start_date = Some(start);
        draft.end_date = Some(start - Duration::days(back));
        let is_date_error = matches!(
            validate_policy_draft(&draft),
            Err(PolicyValidationError::EndNotAfterStart { .. })
        );
        prop_assert!(is_date_error);
    }
}
