//! Claims Domain Ports
//!
//! Maps to `POST /claims`, `PUT /claims/{id}` and `GET /claims` in the HTTP
//! adapter.

use async_trait::async_trait;

use core_kernel::{ClaimId, DomainPort, PortError, RequestContext};

use crate::claim::{Claim, ClaimSubmission};

/// Repository operations on claims
#[async_trait]
pub trait ClaimPort: DomainPort {
    /// Files a claim; the repository assigns its id
    async fn create_claim(
        &self,
        submission: &ClaimSubmission,
        ctx: &RequestContext,
    ) -> Result<Claim, PortError>;

    async fn update_claim(
        &self,
        id: ClaimId,
        submission: &ClaimSubmission,
        ctx: &RequestContext,
    ) -> Result<Claim, PortError>;

    /// Lists the claims visible to the caller
    async fn list_claims(&self, ctx: &RequestContext) -> Result<Vec<Claim>, PortError>;
}
