//! Session handling for the podium contest client.
//!
//! This crate provides:
//! - Credential storage (`CredentialStore` and its memory, file and browser backends)
//! - Claims decoding from the stored credential (`ClaimsDecoder`, `Claims`)
//! - Authenticated backend calls (`AuthenticatedRequest`)
//! - Login, logout and role-gated view state (`SessionController`, `RoleGate`)
//!
//! # Access Model
//!
//! The backend issues a signed token at login. The client never verifies the
//! signature; it only reads the `roles` claim to decide which panels to show.
//! Every protected route is enforced by the backend.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use podium_session::{ClientConfig, MemoryCredentialStore, Role, SessionController};
//!
//! let session = SessionController::new(
//!     ClientConfig::new("http://127.0.0.1:5000"),
//!     Arc::new(MemoryCredentialStore::new()),
//!     reqwest::Client::new(),
//! );
//!
//! let view = session.restore();
//! assert!(view.login_visible());
//! assert!(!view.shows(Role::Admin));
//! ```

pub mod claims;
pub mod config;
pub mod error;
pub mod request;
pub mod role;
pub mod session;
pub mod store;
#[cfg(feature = "web")]
pub mod web;

pub use claims::{Claims, ClaimsDecoder};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{GENERIC_LOGIN_FAILURE, LoginError, MalformedCredential, RequestError, StoreError};
pub use request::{ApiResponse, AuthenticatedRequest, RequestOptions, merge_headers};
pub use role::{Role, RoleGate, ViewState};
pub use session::{SessionController, SessionState};
pub use store::{CredentialReader, CredentialStore, FileCredentialStore, MemoryCredentialStore};
#[cfg(feature = "web")]
pub use web::LocalStorageCredentialStore;
