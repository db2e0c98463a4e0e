//! Core Kernel - Foundational types shared by the policy desk crates
//!
//! This crate provides the building blocks used across all domain modules:
//! - Server-assigned identifiers
//! - Calendar anchoring and clocks
//! - Serde helpers for the repository wire format
//! - The port error and request context every adapter speaks

pub mod identifiers;
pub mod temporal;
pub mod wire;
pub mod ports;
pub mod error;

pub use identifiers::{PolicyId, ClaimId, UserId};
pub use temporal::{Timezone, Clock, SystemClock, FixedClock, TemporalError, days_until};
pub use ports::{PortError, DomainPort, RequestContext};
pub use error::CoreError;
