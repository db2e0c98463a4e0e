//! Record controller
//!
//! Orchestrates every create, update, list and delete:
//!
//! ```text
//! draft ──► validate ──► session check ──► attach owner/timestamps ──► port
//!   │            │              │                                       │
//!   │       InvalidPolicy/  Unauthenticated                     RemoteFailure
//!   │       InvalidClaim                                         (server message
//!   │                                                             or fallback)
//!   └── borrowed, so a failed save leaves the caller's draft intact
//! ```
//!
//! One attempt per call. Nothing is cached; after a successful mutation a
//! [`RecordChange`] is broadcast so listeners know to refetch.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use core_kernel::{ClaimId, Clock, PolicyId, PortError, RequestContext, SystemClock, Timezone, UserId};
use domain_claims::{ensure_eligible, Claim, ClaimDraft, ClaimPort, ClaimStatus, ClaimValidator};
use domain_policy::{Policy, PolicyDraft, PolicyPort, PolicyValidator};

use crate::error::RecordError;
use crate::session::Session;

const SAVE_POLICY_FAILED: &str = "Failed to save policy";
const SAVE_CLAIM_FAILED: &str = "Failed to save claim";
const DELETE_POLICY_FAILED: &str = "Failed to delete policy";
const LOAD_POLICIES_FAILED: &str = "Failed to load policies";
const LOAD_CLAIMS_FAILED: &str = "Failed to load claims";

/// Capacity of the change channel; slow listeners see `Lagged` beyond it
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// A record changed on the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordChange {
    PolicyCreated {
        policy_id: PolicyId,
        timestamp: DateTime<Utc>,
    },
    PolicyUpdated {
        policy_id: PolicyId,
        timestamp: DateTime<Utc>,
    },
    PolicyDeleted {
        policy_id: PolicyId,
        timestamp: DateTime<Utc>,
    },
    ClaimFiled {
        claim_id: ClaimId,
        policy_id: PolicyId,
        timestamp: DateTime<Utc>,
    },
    ClaimUpdated {
        claim_id: ClaimId,
        timestamp: DateTime<Utc>,
    },
}

impl RecordChange {
    /// True for changes that invalidate a policy list
    pub fn affects_policies(&self) -> bool {
        matches!(
            self,
            RecordChange::PolicyCreated { .. }
                | RecordChange::PolicyUpdated { .. }
                | RecordChange::PolicyDeleted { .. }
        )
    }

    /// True for changes that invalidate a claim list
    pub fn affects_claims(&self) -> bool {
        !self.affects_policies()
    }
}

/// Create/update orchestration over the repository ports
pub struct RecordController {
    policies: Arc<dyn PolicyPort>,
    claims: Arc<dyn ClaimPort>,
    clock: Arc<dyn Clock>,
    timezone: Timezone,
    changes: broadcast::Sender<RecordChange>,
}

impl RecordController {
    pub fn new(policies: Arc<dyn PolicyPort>, claims: Arc<dyn ClaimPort>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            policies,
            claims,
            clock: Arc::new(SystemClock),
            timezone: Timezone::default(),
            changes,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Zone in which policy end dates are anchored for eligibility
    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    /// Listens for successful mutations
    pub fn subscribe(&self) -> broadcast::Receiver<RecordChange> {
        self.changes.subscribe()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// Creates a policy owned by the session user
    pub async fn create_policy(
        &self,
        session: &Session,
        draft: &PolicyDraft,
    ) -> Result<Policy, RecordError> {
        PolicyValidator::validate(draft)?;
        let user_id = require_user(session)?;

        let submission = draft.clone().into_submission(user_id)?;
        let policy = self
            .policies
            .create_policy(&submission, &request_context(session))
            .await
            .map_err(|e| remote_failure("create policy", e, SAVE_POLICY_FAILED))?;

        info!(policy_id = %policy.policy_id, user_id = %user_id, "Policy created");
        self.publish(RecordChange::PolicyCreated {
            policy_id: policy.policy_id,
            timestamp: self.now(),
        });
        Ok(policy)
    }

    /// Replaces the editable fields of policy `id`
    pub async fn update_policy(
        &self,
        session: &Session,
        id: PolicyId,
        draft: &PolicyDraft,
    ) -> Result<Policy, RecordError> {
        PolicyValidator::validate(draft)?;
        let user_id = require_user(session)?;

        let submission = draft.clone().into_submission(user_id)?;
        let policy = self
            .policies
            .update_policy(id, &submission, &request_context(session))
            .await
            .map_err(|e| remote_failure("update policy", e, SAVE_POLICY_FAILED))?;

        info!(policy_id = %id, "Policy updated");
        self.publish(RecordChange::PolicyUpdated {
            policy_id: id,
            timestamp: self.now(),
        });
        Ok(policy)
    }

    /// Deletes policy `id`
    ///
    /// Asking the user to confirm is the caller's job; a declined
    /// confirmation simply never calls this.
    pub async fn delete_policy(&self, session: &Session, id: PolicyId) -> Result<(), RecordError> {
        require_user(session)?;

        self.policies
            .delete_policy(id, &request_context(session))
            .await
            .map_err(|e| remote_failure("delete policy", e, DELETE_POLICY_FAILED))?;

        info!(policy_id = %id, "Policy deleted");
        self.publish(RecordChange::PolicyDeleted {
            policy_id: id,
            timestamp: self.now(),
        });
        Ok(())
    }

    pub async fn list_policies(&self, session: &Session) -> Result<Vec<Policy>, RecordError> {
        require_user(session)?;

        self.policies
            .list_policies(&request_context(session))
            .await
            .map_err(|e| remote_failure("list policies", e, LOAD_POLICIES_FAILED))
    }

    /// Files a new claim against one of `policies`
    ///
    /// `policies` is the caller's current policy list; the target must be in
    /// it and still be active.
    pub async fn create_claim(
        &self,
        session: &Session,
        draft: &ClaimDraft,
        policies: &[Policy],
    ) -> Result<Claim, RecordError> {
        ClaimValidator::validate(draft)?;
        let user_id = require_user(session)?;
        let now = self.now();
        if let Some(policy_id) = draft.policy_id {
            ensure_eligible(policy_id, policies, now, self.timezone)?;
        }

        let submission = draft
            .clone()
            .into_submission(user_id, ClaimStatus::Submitted, now)?;
        let claim = self
            .claims
            .create_claim(&submission, &request_context(session))
            .await
            .map_err(|e| remote_failure("create claim", e, SAVE_CLAIM_FAILED))?;

        info!(claim_id = %claim.claim_id, policy_id = %claim.policy_id, "Claim filed");
        self.publish(RecordChange::ClaimFiled {
            claim_id: claim.claim_id,
            policy_id: claim.policy_id,
            timestamp: now,
        });
        Ok(claim)
    }

    /// Amends amount and description of `current`
    ///
    /// Status and submission time are carried over from `current`.
    pub async fn update_claim(
        &self,
        session: &Session,
        current: &Claim,
        draft: &ClaimDraft,
    ) -> Result<Claim, RecordError> {
        ClaimValidator::validate_edit(current, draft)?;
        let user_id = require_user(session)?;

        let submission = draft
            .clone()
            .into_submission(user_id, current.status, current.submitted_at)?;
        let claim = self
            .claims
            .update_claim(current.claim_id, &submission, &request_context(session))
            .await
            .map_err(|e| remote_failure("update claim", e, SAVE_CLAIM_FAILED))?;

        info!(claim_id = %current.claim_id, "Claim updated");
        self.publish(RecordChange::ClaimUpdated {
            claim_id: current.claim_id,
            timestamp: self.now(),
        });
        Ok(claim)
    }

    pub async fn list_claims(&self, session: &Session) -> Result<Vec<Claim>, RecordError> {
        require_user(session)?;

        self.claims
            .list_claims(&request_context(session))
            .await
            .map_err(|e| remote_failure("list claims", e, LOAD_CLAIMS_FAILED))
    }

    fn publish(&self, change: RecordChange) {
        // No subscribers is fine
        let _ = self.changes.send(change);
    }
}

fn require_user(session: &Session) -> Result<UserId, RecordError> {
    if !session.is_authenticated() {
        return Err(RecordError::Unauthenticated);
    }
    session.current_user_id().ok_or(RecordError::Unauthenticated)
}

/// Bearer context with a fresh correlation id for one repository call
fn request_context(session: &Session) -> RequestContext {
    session
        .request_context()
        .with_correlation_id(Uuid::new_v4().to_string())
}

fn remote_failure(operation: &str, error: PortError, fallback: &str) -> RecordError {
    warn!(operation, error = %error, "Repository call failed");
    RecordError::remote(error, fallback)
}
