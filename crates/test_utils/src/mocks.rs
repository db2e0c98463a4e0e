//! In-memory repository ports
//!
//! Stand-ins for the HTTP repository. Each mock counts every call it
//! receives, remembers the last request context, and can be told to fail.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use core_kernel::{ClaimId, DomainPort, PolicyId, PortError, RequestContext};
use domain_claims::{Claim, ClaimPort, ClaimSubmission};
use domain_policy::{Policy, PolicyPort, PolicySubmission};

/// A failure a mock returns instead of doing its job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectedFailure {
    /// Non-2xx answer, optionally with a server message
    Rejected { status: u16, message: Option<String> },
    /// The server could not be reached
    Connection,
    Timeout,
}

impl InjectedFailure {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        InjectedFailure::Rejected {
            status,
            message: Some(message.into()),
        }
    }

    fn to_port_error(&self, operation: &str) -> PortError {
        match self {
            InjectedFailure::Rejected { status, message } => {
                PortError::rejected(*status, message.clone())
            }
            InjectedFailure::Connection => PortError::connection("connection refused"),
            InjectedFailure::Timeout => PortError::Timeout {
                operation: operation.to_string(),
            },
        }
    }
}

/// Bookkeeping shared by both mocks
#[derive(Debug, Default)]
struct CallLog {
    calls: AtomicUsize,
    failure: RwLock<Option<InjectedFailure>>,
    last_context: RwLock<Option<RequestContext>>,
}

impl CallLog {
    async fn enter(&self, operation: &str, ctx: &RequestContext) -> Result<(), PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_context.write().await = Some(ctx.clone());
        match self.failure.read().await.as_ref() {
            Some(failure) => Err(failure.to_port_error(operation)),
            None => Ok(()),
        }
    }

    async fn last_bearer(&self) -> Option<String> {
        self.last_context
            .read()
            .await
            .as_ref()
            .and_then(|ctx| ctx.bearer_token().map(str::to_string))
    }

    async fn last_correlation_id(&self) -> Option<String> {
        self.last_context
            .read()
            .await
            .as_ref()
            .and_then(|ctx| ctx.correlation_id.clone())
    }
}

/// In-memory mock implementation of PolicyPort
#[derive(Debug, Default)]
pub struct MockPolicyPort {
    policies: Arc<RwLock<BTreeMap<PolicyId, Policy>>>,
    last_id: AtomicI64,
    log: CallLog,
}

impl MockPolicyPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates with policies; new ids continue after the highest one
    pub async fn with_policies(policies: Vec<Policy>) -> Self {
        let port = Self::new();
        {
            let mut stored = port.policies.write().await;
            for policy in policies {
                port.last_id.fetch_max(policy.policy_id.get(), Ordering::SeqCst);
                stored.insert(policy.policy_id, policy);
            }
        }
        port
    }

    /// Makes every following call fail
    pub async fn fail_with(&self, failure: InjectedFailure) {
        *self.log.failure.write().await = Some(failure);
    }

    pub async fn clear_failure(&self) {
        *self.log.failure.write().await = None;
    }

    /// Number of port calls received, failed ones included
    pub fn call_count(&self) -> usize {
        self.log.calls.load(Ordering::SeqCst)
    }

    pub async fn last_bearer(&self) -> Option<String> {
        self.log.last_bearer().await
    }

    pub async fn last_correlation_id(&self) -> Option<String> {
        self.log.last_correlation_id().await
    }

    pub async fn stored(&self) -> Vec<Policy> {
        self.policies.read().await.values().cloned().collect()
    }
}

impl DomainPort for MockPolicyPort {}

#[async_trait]
impl PolicyPort for MockPolicyPort {
    async fn create_policy(
        &self,
        submission: &PolicySubmission,
        ctx: &RequestContext,
    ) -> Result<Policy, PortError> {
        self.log.enter("create policy", ctx).await?;
        let id = PolicyId::new(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        let policy = Policy::from_submission(id, submission.clone());
        self.policies.write().await.insert(id, policy.clone());
        Ok(policy)
    }

    async fn update_policy(
        &self,
        id: PolicyId,
        submission: &PolicySubmission,
        ctx: &RequestContext,
    ) -> Result<Policy, PortError> {
        self.log.enter("update policy", ctx).await?;
        let mut policies = self.policies.write().await;
        let slot = policies
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("Policy", id))?;
        *slot = Policy::from_submission(id, submission.clone());
        Ok(slot.clone())
    }

    async fn list_policies(&self, ctx: &RequestContext) -> Result<Vec<Policy>, PortError> {
        self.log.enter("list policies", ctx).await?;
        Ok(self.stored().await)
    }

    async fn delete_policy(&self, id: PolicyId, ctx: &RequestContext) -> Result<(), PortError> {
        self.log.enter("delete policy", ctx).await?;
        self.policies
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PortError::not_found("Policy", id))
    }
}

/// In-memory mock implementation of ClaimPort
#[derive(Debug, Default)]
pub struct MockClaimPort {
    claims: Arc<RwLock<BTreeMap<ClaimId, Claim>>>,
    last_id: AtomicI64,
    log: CallLog,
}

impl MockClaimPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_claims(claims: Vec<Claim>) -> Self {
        let port = Self::new();
        {
            let mut stored = port.claims.write().await;
            for claim in claims {
                port.last_id.fetch_max(claim.claim_id.get(), Ordering::SeqCst);
                stored.insert(claim.claim_id, claim);
            }
        }
        port
    }

    pub async fn fail_with(&self, failure: InjectedFailure) {
        *self.log.failure.write().await = Some(failure);
    }

    pub async fn clear_failure(&self) {
        *self.log.failure.write().await = None;
    }

    pub fn call_count(&self) -> usize {
        self.log.calls.load(Ordering::SeqCst)
    }

    pub async fn last_bearer(&self) -> Option<String> {
        self.log.last_bearer().await
    }

    pub async fn stored(&self) -> Vec<Claim> {
        self.claims.read().await.values().cloned().collect()
    }
}

impl DomainPort for MockClaimPort {}

#[async_trait]
impl ClaimPort for MockClaimPort {
    async fn create_claim(
        &self,
        submission: &ClaimSubmission,
        ctx: &RequestContext,
    ) -> Result<Claim, PortError> {
        self.log.enter("create claim", ctx).await?;
        let id = ClaimId::new(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        let claim = Claim::from_submission(id, submission.clone());
        self.claims.write().await.insert(id, claim.clone());
        Ok(claim)
    }

    async fn update_claim(
        &self,
        id: ClaimId,
        submission: &ClaimSubmission,
        ctx: &RequestContext,
    ) -> Result<Claim, PortError> {
        self.log.enter("update claim", ctx).await?;
        let mut claims = self.claims.write().await;
        let slot = claims
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("Claim", id))?;
        *slot = Claim::from_submission(id, submission.clone());
        Ok(slot.clone())
    }

    async fn list_claims(&self, ctx: &RequestContext) -> Result<Vec<Claim>, PortError> {
        self.log.enter("list claims", ctx).await?;
        Ok(self.stored().await)
    }
}
