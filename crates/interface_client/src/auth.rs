//! Auth service client
//!
//! `POST /auth/register` and `POST /auth/login`. A login answer carrying a
//! token is persisted along with its decoded payload, so later runs can
//! restore the [`Session`].

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{join_url, ClientConfig};
use crate::error::{AuthError, StoreError};
use crate::session::{decode_payload, Session};
use crate::store::{TokenStore, TOKEN_KEY, USER_KEY};

/// Login form
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration form
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Client for the external auth service
#[derive(Clone)]
pub struct AuthClient {
    base_url: String,
    http: reqwest::Client,
    store: Arc<dyn TokenStore>,
}

impl AuthClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self, AuthError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(AuthError::Transport)?;

        Ok(Self {
            base_url: base_url.into(),
            http,
            store,
        })
    }

    pub fn from_config(config: &ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self, AuthError> {
        Self::new(config.api_base_url.clone(), config.timeout(), store)
    }

    /// Registers an account and returns the service's answer as-is
    pub async fn register<T>(&self, user_data: &T) -> Result<Value, AuthError>
    where
        T: Serialize + ?Sized + Sync,
    {
        let answer = self.post("/auth/register", user_data, "Registration failed").await;
        if let Err(e) = &answer {
            warn!(error = %e, "Register request failed");
        }
        answer
    }

    /// Logs in and persists the token and decoded user when one is returned
    pub async fn login(&self, credentials: &Credentials) -> Result<Value, AuthError> {
        let answer = self.post("/auth/login", credentials, "Login failed").await?;

        if let Some(token) = answer.get("token").and_then(Value::as_str) {
            let payload = decode_payload(token)?;
            self.store.set(TOKEN_KEY, token)?;
            self.store.set(USER_KEY, &payload.to_string())?;
            info!(email = %credentials.email, "Logged in");
        } else {
            debug!("Login answer carried no token");
        }

        Ok(answer)
    }

    /// Forgets the token and the user
    pub fn logout(&self) -> Result<(), StoreError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        info!("Logged out");
        Ok(())
    }

    /// The stored user object, if there is a readable one
    pub fn current_user(&self) -> Option<Value> {
        self.store.user()
    }

    /// True iff a token is stored
    pub fn is_authenticated(&self) -> bool {
        match self.store.token() {
            Ok(token) => token.is_some(),
            Err(e) => {
                warn!(error = %e, "Could not read stored token");
                false
            }
        }
    }

    /// The session the stored state describes
    pub fn session(&self) -> Result<Session, StoreError> {
        Session::from_store(self.store.as_ref())
    }

    async fn post<T>(&self, path: &str, body: &T, fallback: &str) -> Result<Value, AuthError>
    where
        T: Serialize + ?Sized + Sync,
    {
        let url = join_url(&self.base_url, path);
        debug!(%url, "Auth request");

        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = server_message(&text).unwrap_or_else(|| fallback.to_string());
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }
}

/// The `message` field of a JSON error body
pub(crate) fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_extraction() {
        assert_eq!(
            server_message(r#"{"message":"Invalid credentials"}"#),
            Some("Invalid credentials".to_string())
        );
        assert_eq!(server_message(r#"{"message":"  "}"#), None);
        assert_eq!(server_message("<html>502</html>"), None);
    }
}
