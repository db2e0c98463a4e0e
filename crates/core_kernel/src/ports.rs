//! Ports and Adapters Infrastructure
//!
//! Domain crates declare repository ports (`PolicyPort`, `ClaimPort`) that
//! depend only on this crate. The HTTP adapter in `interface_client` and the
//! in-memory mocks in `test_utils` implement them.
//!
//! ```text
//!   RecordController ──► PolicyPort / ClaimPort ◄── HttpRepository (reqwest)
//!                                               ◄── MockPolicyPort (tests)
//! ```

use std::fmt;
use thiserror::Error;

/// Error type for port operations
///
/// Every adapter reports failures through this type so the controller can
/// turn them into one user-facing message.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested record was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
        server_message: Option<String>,
    },

    /// The server rejected the request
    #[error("Rejected with status {status}: {}", .server_message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        server_message: Option<String>,
    },

    /// Authentication or authorization failed on the server
    #[error("Unauthorized: {}", .server_message.as_deref().unwrap_or("no message"))]
    Unauthorized {
        server_message: Option<String>,
    },

    /// Connection to the repository failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout: {operation}")]
    Timeout {
        operation: String,
    },

    /// The response could not be decoded
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
            server_message: None,
        }
    }

    /// Creates a Rejected error carrying the server's message, if any
    pub fn rejected(status: u16, server_message: Option<String>) -> Self {
        PortError::Rejected {
            status,
            server_message,
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a Transformation error
    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    /// The human-readable message supplied by the server, when there was one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            PortError::NotFound { server_message, .. }
            | PortError::Rejected { server_message, .. }
            | PortError::Unauthorized { server_message } => server_message
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// Returns true if this error indicates the record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits extend this marker so they can be shared across tasks.
pub trait DomainPort: Send + Sync + 'static {}

/// Per-request context passed to every port call
///
/// Carries the bearer credential the server authorizes against and a
/// correlation id for tracing.
#[derive(Clone, Default)]
pub struct RequestContext {
    bearer_token: Option<String>,
    /// Correlation ID for tracing across systems
    pub correlation_id: Option<String>,
}

impl RequestContext {
    /// Context for an anonymous request
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context carrying a bearer token
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            bearer_token: Some(token.into()),
            correlation_id: None,
        }
    }

    /// Sets the correlation ID
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }
}

// Never print the credential
impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("correlation_id", &self.correlation_id)
            .finish()
    }
}
