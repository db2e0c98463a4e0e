//! HTTP Repository Adapter
//!
//! Implements `PolicyPort` and `ClaimPort` against the REST repository. Every
//! request carries the session's bearer token.
//!
//! # Error Handling
//!
//! - 404 -> `PortError::NotFound`
//! - 401/403 -> `PortError::Unauthorized`
//! - other non-2xx -> `PortError::Rejected`
//! - timeouts -> `PortError::Timeout`
//! - transport failures -> `PortError::Connection`
//! - undecodable bodies -> `PortError::Transformation`
//!
//! A JSON `{ "message": ... }` error body is kept as the server message.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use core_kernel::{ClaimId, DomainPort, PolicyId, PortError, RequestContext};
use domain_claims::{Claim, ClaimPort, ClaimSubmission};
use domain_policy::{Policy, PolicyPort, PolicySubmission};

use crate::auth::server_message;
use crate::config::{join_url, ClientConfig};

/// REST repository client
#[derive(Debug, Clone)]
pub struct HttpRepository {
    base_url: String,
    http: reqwest::Client,
}

impl HttpRepository {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, PortError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| PortError::Internal {
            message: "Failed to build HTTP client".to_string(),
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, PortError> {
        Self::new(config.api_base_url.clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, ctx: &RequestContext) -> RequestBuilder {
        let url = join_url(&self.base_url, path);
        debug!(method = method.as_str(), %url, correlation_id = ?ctx.correlation_id, "Repository request");

        let mut builder = self.http.request(method, url);
        if let Some(token) = ctx.bearer_token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(correlation_id) = &ctx.correlation_id {
            builder = builder.header("X-Correlation-ID", correlation_id);
        }
        builder
    }

    /// Sends the request and returns the body of a successful answer
    async fn send(&self, builder: RequestBuilder, call: Call<'_>) -> Result<String, PortError> {
        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(e, call.operation))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, call.operation))?;

        if status.is_success() {
            return Ok(body);
        }

        let error = status_error(status, &body, call.entity_type, call.id);
        warn!(
            operation = call.operation,
            status = status.as_u16(),
            error = %error,
            "Repository call failed"
        );
        Err(error)
    }

    async fn write<B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        ctx: &RequestContext,
        call: Call<'_>,
    ) -> Result<String, PortError>
    where
        B: Serialize + Sync,
    {
        let builder = self.request(method, path, ctx).json(body);
        self.send(builder, call).await
    }
}

/// What a request is for, used in errors and logs
struct Call<'a> {
    operation: &'a str,
    entity_type: &'a str,
    id: Option<String>,
}

impl<'a> Call<'a> {
    fn new(operation: &'a str, entity_type: &'a str) -> Self {
        Self {
            operation,
            entity_type,
            id: None,
        }
    }

    fn on(mut self, id: impl std::fmt::Display) -> Self {
        self.id = Some(id.to_string());
        self
    }
}

fn transport_error(error: reqwest::Error, operation: &str) -> PortError {
    if error.is_timeout() {
        PortError::Timeout {
            operation: operation.to_string(),
        }
    } else {
        PortError::Connection {
            message: format!("{} failed: {}", operation, error),
            source: Some(Box::new(error)),
        }
    }
}

fn status_error(status: StatusCode, body: &str, entity_type: &str, id: Option<String>) -> PortError {
    let server_message = server_message(body);
    match status {
        StatusCode::NOT_FOUND => PortError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.unwrap_or_default(),
            server_message,
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            PortError::Unauthorized { server_message }
        }
        _ => PortError::rejected(status.as_u16(), server_message),
    }
}

fn decode<T: DeserializeOwned>(body: &str, what: &str) -> Result<T, PortError> {
    serde_json::from_str(body)
        .map_err(|e| PortError::transformation(format!("Unreadable {}: {}", what, e)))
}

/// Reads a create/update answer: the full record, or an object carrying only
/// the assigned id under `id_key`, from which the record is rebuilt
fn record_or_id<T: DeserializeOwned>(
    body: &str,
    id_key: &str,
) -> Result<Result<T, Option<i64>>, PortError> {
    if body.trim().is_empty() {
        return Ok(Err(None));
    }
    let value: Value = decode(body, "response")?;
    if let Ok(record) = serde_json::from_value::<T>(value.clone()) {
        return Ok(Ok(record));
    }
    Ok(Err(value.get(id_key).and_then(Value::as_i64)))
}

impl DomainPort for HttpRepository {}

#[async_trait]
impl PolicyPort for HttpRepository {
    async fn create_policy(
        &self,
        submission: &PolicySubmission,
        ctx: &RequestContext,
    ) -> Result<Policy, PortError> {
        let body = self
            .write(Method::POST, "/policies", submission, ctx, Call::new("create policy", "Policy"))
            .await?;

        match record_or_id::<Policy>(&body, "policyId")? {
            Ok(policy) => Ok(policy),
            Err(Some(id)) => Ok(Policy::from_submission(PolicyId::new(id), submission.clone())),
            Err(None) => Err(PortError::transformation(
                "Create policy answer carried no policy id",
            )),
        }
    }

    async fn update_policy(
        &self,
        id: PolicyId,
        submission: &PolicySubmission,
        ctx: &RequestContext,
    ) -> Result<Policy, PortError> {
        let path = format!("/policies/{}", id.get());
        let body = self
            .write(Method::PUT, &path, submission, ctx, Call::new("update policy", "Policy").on(id))
            .await?;

        match record_or_id::<Policy>(&body, "policyId")? {
            Ok(policy) => Ok(policy),
            Err(_) => Ok(Policy::from_submission(id, submission.clone())),
        }
    }

    async fn list_policies(&self, ctx: &RequestContext) -> Result<Vec<Policy>, PortError> {
        let builder = self.request(Method::GET, "/policies", ctx);
        let body = self.send(builder, Call::new("list policies", "Policy")).await?;
        decode(&body, "policy list")
    }

    async fn delete_policy(&self, id: PolicyId, ctx: &RequestContext) -> Result<(), PortError> {
        let path = format!("/policies/{}", id.get());
        let builder = self.request(Method::DELETE, &path, ctx);
        self.send(builder, Call::new("delete policy", "Policy").on(id))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl ClaimPort for HttpRepository {
    async fn create_claim(
        &self,
        submission: &ClaimSubmission,
        ctx: &RequestContext,
    ) -> Result<Claim, PortError> {
        let body = self
            .write(Method::POST, "/claims", submission, ctx, Call::new("create claim", "Claim"))
            .await?;

        match record_or_id::<Claim>(&body, "claimId")? {
            Ok(claim) => Ok(claim),
            Err(Some(id)) => Ok(Claim::from_submission(ClaimId::new(id), submission.clone())),
            Err(None) => Err(PortError::transformation(
                "Create claim answer carried no claim id",
            )),
        }
    }

    async fn update_claim(
        &self,
        id: ClaimId,
        submission: &ClaimSubmission,
        ctx: &RequestContext,
    ) -> Result<Claim, PortError> {
        let path = format!("/claims/{}", id.get());
        let body = self
            .write(Method::PUT, &path, submission, ctx, Call::new("update claim", "Claim").on(id))
            .await?;

        match record_or_id::<Claim>(&body, "claimId")? {
            Ok(claim) => Ok(claim),
            Err(_) => Ok(Claim::from_submission(id, submission.clone())),
        }
    }

    async fn list_claims(&self, ctx: &RequestContext) -> Result<Vec<Claim>, PortError> {
        let builder = self.request(Method::GET, "/claims", ctx);
        let body = self.send(builder, Call::new("list claims", "Claim")).await?;
        decode(&body, "claim list")
    }
}
