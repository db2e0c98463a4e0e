//! Test Utilities Crate
//!
//! Shared test infrastructure for the policy desk workspace.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built records and a pinned "now"
//! - `builders`: Builder patterns for policies and claims
//! - `generators`: Property-based test data generators
//! - `mocks`: In-memory `PolicyPort` / `ClaimPort` with call counting and
//!   failure injection
//! - `tokens`: Signed test tokens with a throwaway secret

pub mod fixtures;
pub mod builders;
pub mod generators;
pub mod mocks;
pub mod tokens;

pub use fixtures::*;
pub use builders::*;
pub use generators::*;
pub use mocks::*;
pub use tokens::*;
