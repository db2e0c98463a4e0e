//! Claims Domain
//!
//! Claim records, the rules a claim draft must satisfy before it is sent, and
//! which policies a new claim may target.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Submitted -> Under Review -> Approved/Rejected
//! ```
//!
//! Only the first step is taken by the client. Every later transition is made
//! by an administrator on the server, so a claim edit never changes status.

pub mod claim;
pub mod validation;
pub mod eligibility;
pub mod ports;
pub mod error;

pub use claim::{Claim, ClaimDraft, ClaimStatus, ClaimSubmission};
pub use validation::{
    validate_claim_draft, validate_claim_edit, ClaimValidator, DESCRIPTION_MAX_CHARS,
    DESCRIPTION_MIN_CHARS,
};
pub use eligibility::{eligible_policies, eligible_policies_in, ensure_eligible, is_eligible};
pub use ports::ClaimPort;
pub use error::ClaimValidationError;
