//! Client Layer
//!
//! Everything between a user's draft and the remote repository.
//!
//! # Architecture
//!
//! - **Session**: identity decoded from the bearer token, restored from the
//!   token store
//! - **Auth**: register, login and logout against the auth service
//! - **HTTP**: `PolicyPort` and `ClaimPort` over the REST repository
//! - **Controller**: validation, session gating and failure mapping for every
//!   record operation
//! - **Config**: `DESK_*` environment configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use interface_client::{ClientConfig, FileTokenStore, HttpRepository, RecordController, Session};
//!
//! let config = ClientConfig::from_env()?;
//! let store = FileTokenStore::new(&config.session_file);
//! let session = Session::from_store(&store)?;
//!
//! let repository = Arc::new(HttpRepository::from_config(&config)?);
//! let controller = RecordController::new(repository.clone(), repository);
//! let policies = controller.list_policies(&session).await?;
//! ```

pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod session;
pub mod store;

pub use auth::{AuthClient, Credentials, Registration};
pub use config::ClientConfig;
pub use controller::{RecordChange, RecordController};
pub use error::{AuthError, RecordError, StoreError};
pub use http::HttpRepository;
pub use session::{decode_payload, user_id_of, Session};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY, USER_KEY};
