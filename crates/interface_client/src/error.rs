//! Client error types
//!
//! Every variant renders as the single sentence shown to the user.

use thiserror::Error;

use core_kernel::PortError;
use domain_claims::ClaimValidationError;
use domain_policy::PolicyValidationError;

/// Why a record operation did not happen
#[derive(Debug, Error)]
pub enum RecordError {
    /// The policy draft broke a rule; nothing was sent
    #[error("{0}")]
    InvalidPolicy(#[from] PolicyValidationError),

    /// The claim draft broke a rule; nothing was sent
    #[error("{0}")]
    InvalidClaim(#[from] ClaimValidationError),

    /// No token, or a token without a readable user id
    #[error("User is not authenticated")]
    Unauthenticated,

    /// The repository call failed
    #[error("{message}")]
    RemoteFailure {
        message: String,
        #[source]
        source: PortError,
    },
}

impl RecordError {
    /// Wraps a port failure, preferring the server's own message
    pub fn remote(source: PortError, fallback: &str) -> Self {
        let message = source
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string());
        RecordError::RemoteFailure { message, source }
    }

    /// True when the draft was refused locally
    pub fn is_invalid(&self) -> bool {
        matches!(self, RecordError::InvalidPolicy(_) | RecordError::InvalidClaim(_))
    }
}

/// Errors from the persisted client state
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session storage is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Session storage lock poisoned")]
    Poisoned,
}

/// Errors from the auth service client
#[derive(Debug, Error)]
pub enum AuthError {
    /// The service answered with an error status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Auth service unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Auth service request timed out")]
    Timeout,

    #[error("Auth service returned an unreadable response: {0}")]
    InvalidResponse(String),

    #[error("Received token could not be decoded: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<reqwest::Error> for AuthError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            AuthError::Timeout
        } else {
            AuthError::Transport(value)
        }
    }
}
