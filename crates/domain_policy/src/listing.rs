//! Filtering and searching a fetched policy list
//!
//! The status filter compares against the effective status, so a record whose
//! end date has passed is listed under Lapsed even if the server still says
//! Active. Search is a case-insensitive substring match on the insurer or the
//! policy type.

use chrono::{DateTime, Utc};
use std::str::FromStr;

use core_kernel::{days_until, Timezone};

use crate::policy::{Policy, PolicyStatus};
use crate::status::EffectiveStatus;

/// Status selector of the listing page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(PolicyStatus),
}

impl StatusFilter {
    fn admits(&self, effective: &EffectiveStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => effective.status() == *status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

/// A policy prepared for display
#[derive(Debug, Clone, Copy)]
pub struct PolicyView<'a> {
    pub policy: &'a Policy,
    pub effective: EffectiveStatus,
    /// May be zero or negative for expired policies
    pub days_until_expiry: i64,
}

/// Listing criteria
#[derive(Debug, Clone, Default)]
pub struct PolicyFilter {
    pub status: StatusFilter,
    pub search: Option<String>,
    pub timezone: Timezone,
}

impl PolicyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        let term = term.trim();
        self.search = if term.is_empty() { None } else { Some(term.to_string()) };
        self
    }

    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    /// Applies the filter, keeping the repository's order
    pub fn apply<'a>(&self, policies: &'a [Policy], now: DateTime<Utc>) -> Vec<PolicyView<'a>> {
        let needle = self.search.as_deref().map(str::to_lowercase);

        policies
            .iter()
            .map(|policy| PolicyView {
                policy,
                effective: policy.effective_status_in(now, self.timezone),
                days_until_expiry: days_until(policy.end_date, now, self.timezone),
            })
            .filter(|view| self.status.admits(&view.effective))
            .filter(|view| match needle.as_deref() {
                Some(needle) => matches_search(view.policy, needle),
                None => true,
            })
            .collect()
    }
}

fn matches_search(policy: &Policy, needle: &str) -> bool {
    policy.insurer.to_lowercase().contains(needle)
        || policy.policy_type.as_str().to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use core_kernel::{PolicyId, UserId};
    use rust_decimal_macros::dec;

    use crate::policy::PolicyType;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    }

    fn policy(id: i64, insurer: &str, policy_type: PolicyType, end: NaiveDate) -> Policy {
        Policy {
            policy_id: PolicyId::new(id),
            user_id: UserId::new(1),
            insurer: insurer.to_string(),
            policy_type,
            premium_amt: dec!(100),
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end_date: end,
            status: PolicyStatus::Active,
        }
    }

    fn book() -> Vec<Policy> {
        vec![
            policy(3, "Acme Mutual", PolicyType::Health, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
            // Stored as Active, ended last month
            policy(1, "Northwind", PolicyType::Motor, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()),
            policy(2, "Zenith", PolicyType::Home, NaiveDate::from_ymd_opt(2024, 6, 11).unwrap()),
        ]
    }

    fn ids(views: &[PolicyView<'_>]) -> Vec<i64> {
        views.iter().map(|v| v.policy.policy_id.get()).collect()
    }

    #[test]
    fn test_expired_active_listed_under_lapsed() {
        let policies = book();

        let lapsed = PolicyFilter::new()
            .with_status(StatusFilter::Only(PolicyStatus::Lapsed))
            .apply(&policies, now());
        assert_eq!(ids(&lapsed), vec![1]);
        assert!(lapsed[0].days_until_expiry <= 0);

        let active = PolicyFilter::new()
            .with_status(StatusFilter::Only(PolicyStatus::Active))
            .apply(&policies, now());
        assert_eq!(ids(&active), vec![3, 2]);
        assert_eq!(active[1].effective.expiring_soon(), Some(10));
    }

    #[test]
    fn test_search_ignores_case_on_insurer_and_type() {
        let policies = book();

        let by_insurer = PolicyFilter::new().with_search("ACME").apply(&policies, now());
        assert_eq!(ids(&by_insurer), vec![3]);

        let by_type = PolicyFilter::new().with_search("motor").apply(&policies, now());
        assert_eq!(ids(&by_type), vec![1]);

        assert!(PolicyFilter::new().with_search("travel").apply(&policies, now()).is_empty());
    }

    #[test]
    fn test_search_term_is_trimmed() {
        let filter = PolicyFilter::new().with_search("  acme ");
        assert_eq!(filter.search.as_deref(), Some("acme"));
        assert_eq!(ids(&filter.apply(&book(), now())), vec![3]);
    }

    #[test]
    fn test_repository_order_is_kept() {
        let policies = book();
        let all = PolicyFilter::new().apply(&policies, now());
        assert_eq!(ids(&all), vec![3, 1, 2]);
    }

    #[test]
    fn test_status_and_search_combine() {
        let policies = book();
        let views = PolicyFilter::new()
            .with_status(StatusFilter::Only(PolicyStatus::Active))
            .with_search("north")
            .apply(&policies, now());
        assert!(views.is_empty());
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("All".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "cancelled".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(PolicyStatus::Cancelled)
        );
        assert!("Dormant".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let filter = PolicyFilter::new().with_search("   ");
        assert!(filter.search.is_none());
    }
}
