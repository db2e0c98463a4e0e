//! The signed-in user, as far as the client knows
//!
//! Identity comes from the token payload. The signature is not checked and
//! neither is the expiry: the payload is only used to show who is signed in
//! and to stamp the owner on new records. The server re-checks the token on
//! every request.

use std::fmt;

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde_json::Value;
use tracing::warn;

use core_kernel::{RequestContext, UserId};

use crate::error::StoreError;
use crate::store::TokenStore;

/// Reads a token's payload without verifying it
pub fn decode_payload(token: &str) -> Result<Value, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Value>(token, &DecodingKey::from_secret(&[]), &validation).map(|data| data.claims)
}

/// The `id` field of a payload, given either as a number or numeric text
pub fn user_id_of(payload: &Value) -> Option<UserId> {
    match payload.get("id")? {
        Value::Number(n) => n.as_i64().map(UserId::new),
        Value::String(s) => s.trim().parse::<i64>().ok().map(UserId::new),
        _ => None,
    }
}

/// Token plus decoded identity
///
/// Built once at startup and passed to every controller call.
#[derive(Clone, Default)]
pub struct Session {
    token: Option<String>,
    user: Option<Value>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session for `token`; an empty token is no token
    pub fn from_token(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.is_empty() {
            return Self::anonymous();
        }

        let user = match decode_payload(&token) {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!(error = %e, "Stored token could not be decoded");
                None
            }
        };

        Self {
            token: Some(token),
            user,
        }
    }

    /// Restores the session from persisted state
    ///
    /// Falls back to the stored user object when the token payload cannot be
    /// read.
    pub fn from_store(store: &dyn TokenStore) -> Result<Self, StoreError> {
        let Some(token) = store.token()? else {
            return Ok(Self::anonymous());
        };

        let mut session = Self::from_token(token);
        if session.user.is_none() {
            session.user = store.user();
        }
        Ok(session)
    }

    /// True iff a token is present
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn current_user_id(&self) -> Option<UserId> {
        self.user.as_ref().and_then(user_id_of)
    }

    /// The decoded payload
    pub fn user(&self) -> Option<&Value> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Request context carrying this session's bearer token
    pub fn request_context(&self) -> RequestContext {
        match &self.token {
            Some(token) => RequestContext::bearer(token.clone()),
            None => RequestContext::anonymous(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_id", &self.current_user_id())
            .finish()
    }
}
