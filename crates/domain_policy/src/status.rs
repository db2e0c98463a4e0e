//! Effective (display) status of a policy
//!
//! The server never re-evaluates a stored status when the end date passes, so
//! a record can still read Active after it has expired. Display code always
//! goes through [`effective_status`].
//!
//! ```text
//! days_left = ceil((start of end_date - now) / 1 day)
//!
//! days_left <= 0        -> Lapsed (whatever was stored)
//! 0 < days_left <= 30   -> stored status + "expires in N days"
//! days_left > 30        -> stored status
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;

use core_kernel::{days_until, Timezone};

use crate::policy::PolicyStatus;

/// How close to its end date a policy must be to carry the expiry marker
pub const EXPIRY_WARNING_DAYS: i64 = 30;

/// Status as it should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EffectiveStatus {
    status: PolicyStatus,
    expires_in_days: Option<u32>,
}

impl EffectiveStatus {
    fn lapsed() -> Self {
        Self {
            status: PolicyStatus::Lapsed,
            expires_in_days: None,
        }
    }

    /// The status badge to show
    pub fn status(&self) -> PolicyStatus {
        self.status
    }

    /// Days left when the policy ends within the warning window
    pub fn expiring_soon(&self) -> Option<u32> {
        self.expires_in_days
    }

    pub fn is_active(&self) -> bool {
        self.status == PolicyStatus::Active
    }

    pub fn is_lapsed(&self) -> bool {
        self.status == PolicyStatus::Lapsed
    }
}

impl fmt::Display for EffectiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expires_in_days {
            Some(1) => write!(f, "{} (expires in 1 day)", self.status),
            Some(days) => write!(f, "{} (expires in {} days)", self.status, days),
            None => write!(f, "{}", self.status),
        }
    }
}

/// Derives the display status with end dates anchored at UTC midnight
pub fn effective_status(stored: PolicyStatus, end_date: NaiveDate, now: DateTime<Utc>) -> EffectiveStatus {
    effective_status_in(stored, end_date, now, Timezone::default())
}

/// Derives the display status with end dates anchored in `timezone`
pub fn effective_status_in(
    stored: PolicyStatus,
    end_date: NaiveDate,
    now: DateTime<Utc>,
    timezone: Timezone,
) -> EffectiveStatus {
    let days_left = days_until(end_date, now, timezone);

    if days_left <= 0 {
        return EffectiveStatus::lapsed();
    }

    let expires_in_days = if days_left <= EXPIRY_WARNING_DAYS {
        u32::try_from(days_left).ok()
    } else {
        None
    };

    EffectiveStatus {
        status: stored,
        expires_in_days,
    }
}
