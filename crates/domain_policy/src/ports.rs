//! Policy Domain Ports
//!
//! The repository owning policy records. The HTTP adapter maps these calls to
//! `POST /policies`, `PUT /policies/{id}`, `GET /policies` and
//! `DELETE /policies/{id}`.

use async_trait::async_trait;

use core_kernel::{DomainPort, PolicyId, PortError, RequestContext};

use crate::policy::{Policy, PolicySubmission};

/// Repository operations on policies
///
/// A single attempt per call; adapters neither cache nor retry.
#[async_trait]
pub trait PolicyPort: DomainPort {
    /// Creates a policy; the repository assigns its id
    async fn create_policy(
        &self,
        submission: &PolicySubmission,
        ctx: &RequestContext,
    ) -> Result<Policy, PortError>;

    /// Replaces every non-identity field of a policy
    async fn update_policy(
        &self,
        id: PolicyId,
        submission: &PolicySubmission,
        ctx: &RequestContext,
    ) -> Result<Policy, PortError>;

    /// Lists the policies visible to the caller
    async fn list_policies(&self, ctx: &RequestContext) -> Result<Vec<Policy>, PortError>;

    /// Deletes a policy
    async fn delete_policy(&self, id: PolicyId, ctx: &RequestContext) -> Result<(), PortError>;
}
