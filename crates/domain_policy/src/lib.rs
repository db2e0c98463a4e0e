//! Policy Domain
//!
//! Policy records, the rules a policy draft must satisfy before it is sent,
//! and the display status derived from the end date.
//!
//! # Policy Lifecycle
//!
//! ```text
//! draft --validate--> submission --create--> Active
//!                                   Active <-> Lapsed <-> Cancelled  (administrative, via update)
//! display: any stored status --end date passed--> Lapsed
//! ```
//!
//! # Example
//!
//! ```rust
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use domain_policy::{effective_status, PolicyStatus};
//!
//! let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();
//! let status = effective_status(PolicyStatus::Active, end, now);
//! assert_eq!(status.expiring_soon(), Some(15));
//! ```

pub mod policy;
pub mod validation;
pub mod status;
pub mod listing;
pub mod ports;
pub mod error;

pub use policy::{Policy, PolicyDraft, PolicyStatus, PolicySubmission, PolicyType};
pub use validation::{validate_policy_draft, PolicyValidator};
pub use status::{effective_status, effective_status_in, EffectiveStatus, EXPIRY_WARNING_DAYS};
pub use listing::{PolicyFilter, PolicyView, StatusFilter};
pub use ports::PolicyPort;
pub use error::PolicyValidationError;
