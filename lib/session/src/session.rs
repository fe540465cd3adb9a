//! Login, logout and the session state machine.
//!
//! `SessionController` is the only component that writes the credential
//! store. Everything else reads through a [`CredentialReader`], which
//! `requester()` hands out.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use rootcause::Report;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::claims::{Claims, ClaimsDecoder};
use crate::config::ClientConfig;
use crate::error::{GENERIC_LOGIN_FAILURE, LoginError};
use crate::request::AuthenticatedRequest;
use crate::role::{RoleGate, ViewState};
use crate::store::{CredentialReader, CredentialStore};

/// Where the session state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No session. The initial state.
    LoggedOut,
    /// A decodable credential is stored.
    LoggedIn,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginSuccess {
    token: Option<String>,
}

#[derive(Deserialize)]
struct LoginFailure {
    message: Option<String>,
}

/// Drives login and logout and derives the view state.
///
/// Shared as `Arc<SessionController>`; every method takes `&self` so a
/// logout can run while a screen's request is still in flight.
pub struct SessionController {
    config: Arc<ClientConfig>,
    http: reqwest::Client,
    store: Arc<dyn CredentialStore>,
    gate: RoleGate,
    logged_in: AtomicBool,
    epoch: AtomicU64,
}

impl SessionController {
    /// Creates a logged-out controller over the given store.
    ///
    /// Call [`SessionController::restore`] to pick up a credential stored
    /// by an earlier run.
    #[must_use]
    pub fn new(config: ClientConfig, store: Arc<dyn CredentialStore>, http: reqwest::Client) -> Self {
        Self {
            config: Arc::new(config),
            http,
            store,
            gate: RoleGate::new(),
            logged_in: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
        }
    }

    /// Replaces the role gate.
    #[must_use]
    pub fn with_role_gate(mut self, gate: RoleGate) -> Self {
        self.gate = gate;
        self
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.logged_in.load(Ordering::SeqCst) {
            SessionState::LoggedIn
        } else {
            SessionState::LoggedOut
        }
    }

    /// Returns a counter bumped by every login and logout.
    ///
    /// A request whose epoch changed while it was in flight belongs to a
    /// session that no longer exists.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Returns a requester that attaches this session's credential.
    #[must_use]
    pub fn requester(&self) -> AuthenticatedRequest {
        AuthenticatedRequest::new(
            self.http.clone(),
            self.config.clone(),
            CredentialReader::new(self.store.clone()),
        )
    }

    /// Picks up a credential left by an earlier run.
    ///
    /// A stored credential that no longer decodes is removed.
    pub fn restore(&self) -> ViewState {
        let Some(token) = self.store.get() else {
            self.logged_in.store(false, Ordering::SeqCst);
            return self.gate.reset();
        };

        match ClaimsDecoder::decode(&token) {
            Ok(claims) => {
                self.logged_in.store(true, Ordering::SeqCst);
                debug!(roles = ?claims.roles(), "restored stored session");
                self.gate.apply(Some(&claims))
            }
            Err(e) => {
                warn!(error = %e, "discarding undecodable stored credential");
                if let Err(e) = self.store.clear() {
                    warn!(error = %e, "failed to discard stored credential");
                }
                self.logged_in.store(false, Ordering::SeqCst);
                self.gate.reset()
            }
        }
    }

    /// Authenticates against the backend and stores the issued credential.
    ///
    /// A failed attempt changes neither the state nor the store.
    ///
    /// # Errors
    ///
    /// - `Rejected` with the backend's `message` (or a generic text) for a
    ///   non-success status
    /// - `MalformedCredential` when the issued token is missing or
    ///   undecodable; the store is rolled back to its previous value
    /// - `NetworkFailure` when the backend cannot be reached
    /// - `Storage` when the store refuses the write
    /// - `Superseded` when a logout or another login finished first; the
    ///   response is discarded and nothing is stored
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Claims, Report<LoginError>> {
        let epoch = self.epoch();
        let response = self
            .http
            .post(self.config.endpoint(self.config.login_path()))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "login request failed");
                LoginError::NetworkFailure {
                    details: e.to_string(),
                }
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| LoginError::NetworkFailure {
            details: e.to_string(),
        })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<LoginFailure>(&body)
                .ok()
                .and_then(|failure| failure.message)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| GENERIC_LOGIN_FAILURE.to_string());
            info!(status = status.as_u16(), "login rejected");
            return Err(LoginError::Rejected {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        if self.epoch() != epoch {
            debug!("discarding login response after a session change");
            return Err(LoginError::Superseded.into());
        }

        let token = serde_json::from_slice::<LoginSuccess>(&body)
            .ok()
            .and_then(|success| success.token)
            .ok_or_else(|| LoginError::MalformedCredential {
                reason: "login response carried no token".to_string(),
            })?;

        let previous = self.store.get();
        self.store.set(&token).map_err(|e| LoginError::Storage {
            details: e.to_string(),
        })?;

        let claims = match ClaimsDecoder::decode(&token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!(error = %e, "login issued an undecodable credential");
                self.roll_back(previous);
                return Err(LoginError::MalformedCredential {
                    reason: e.current_context().reason.clone(),
                }
                .into());
            }
        };

        self.logged_in.store(true, Ordering::SeqCst);
        self.epoch.fetch_add(1, Ordering::SeqCst);
        info!(roles = ?claims.roles(), "logged in");
        Ok(claims)
    }

    fn roll_back(&self, previous: Option<String>) {
        let restored = match previous {
            Some(token) => self.store.set(&token),
            None => self.store.clear(),
        };
        if let Err(e) = restored {
            warn!(error = %e, "failed to roll back credential store");
        }
    }

    /// Ends the session and hides every role-gated element.
    ///
    /// Always succeeds and is idempotent. A store that cannot be cleared is
    /// logged; the controller is logged out regardless.
    pub fn logout(&self) -> ViewState {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear stored credential");
        }
        let was_logged_in = self.logged_in.swap(false, Ordering::SeqCst);
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if was_logged_in {
            info!("logged out");
        }
        self.gate.reset()
    }

    /// Decodes the claims of the stored credential while logged in.
    #[must_use]
    pub fn claims(&self) -> Option<Claims> {
        if self.state() == SessionState::LoggedOut {
            return None;
        }
        let token = self.store.get()?;
        match ClaimsDecoder::decode(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                warn!(error = %e, "stored credential no longer decodes");
                None
            }
        }
    }

    /// Recomputes the view state from the current session.
    #[must_use]
    pub fn view(&self) -> ViewState {
        self.gate.apply(self.claims().as_ref())
    }

    /// Reacts to a 401 from an authenticated call.
    ///
    /// Logs out only when `logout_on_unauthorized` is configured, returning
    /// the reset view in that case. Otherwise the session is kept.
    pub fn handle_unauthorized(&self) -> Option<ViewState> {
        if self.config.logout_on_unauthorized() {
            info!("backend rejected the credential, logging out");
            Some(self.logout())
        } else {
            warn!("backend rejected the credential, keeping local session");
            None
        }
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("base_url", &self.config.base_url())
            .field("state", &self.state())
            .field("epoch", &self.epoch())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequestError;
    use crate::request::RequestOptions;
    use crate::role::Role;
    use crate::store::MemoryCredentialStore;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use httpmock::prelude::*;
    use serde_json::{Value, json};

    fn token_for(payload: &Value) -> String {
        format!("h.{}.s", URL_SAFE_NO_PAD.encode(payload.to_string()))
    }

    fn controller(config: ClientConfig) -> (SessionController, Arc<MemoryCredentialStore>) {
        let store = Arc::new(MemoryCredentialStore::new());
        let session = SessionController::new(config, store.clone(), reqwest::Client::new());
        (session, store)
    }

    #[test]
    fn starts_logged_out() {
        let (session, store) = controller(ClientConfig::new("http://localhost"));
        assert_eq!(session.state(), SessionState::LoggedOut);
        assert_eq!(session.view(), RoleGate::new().reset());
        assert_eq!(store.get(), None);
    }

    #[test]
    fn logout_is_idempotent() {
        let (session, store) = controller(ClientConfig::new("http://localhost"));
        let first = session.logout();
        let second = session.logout();
        assert_eq!(first, RoleGate::new().reset());
        assert_eq!(second, first);
        assert_eq!(store.get(), None);
        assert_eq!(session.state(), SessionState::LoggedOut);
    }

    #[test]
    fn restore_picks_up_stored_credential() {
        let store = Arc::new(MemoryCredentialStore::with_token(token_for(
            &json!({"roles": ["judge"]}),
        )));
        let session = SessionController::new(
            ClientConfig::new("http://localhost"),
            store,
            reqwest::Client::new(),
        );

        let view = session.restore();
        assert_eq!(session.state(), SessionState::LoggedIn);
        assert!(view.shows(Role::Judge));
        assert_eq!(session.view(), view);
    }

    #[test]
    fn restore_discards_undecodable_credential() {
        let store = Arc::new(MemoryCredentialStore::with_token("garbage"));
        let session = SessionController::new(
            ClientConfig::new("http://localhost"),
            store.clone(),
            reqwest::Client::new(),
        );

        let view = session.restore();
        assert_eq!(session.state(), SessionState::LoggedOut);
        assert!(!view.is_authenticated());
        assert_eq!(store.get(), None);
    }

    #[tokio::test]
    async fn admin_login_shows_admin_panel_only() {
        let server = MockServer::start_async().await;
        let token = token_for(&json!({"user_id": 1, "roles": ["admin"]}));
        let login = server.mock(|when, then| {
            when.method(POST)
                .path("/login")
                .json_body(json!({"email": "a@b.com", "password": "x"}));
            then.status(200).json_body(json!({"token": token}));
        });

        let (session, store) = controller(ClientConfig::new(server.base_url()));
        let claims = session.login("a@b.com", "x").await.expect("login");

        login.assert();
        assert_eq!(session.state(), SessionState::LoggedIn);
        assert_eq!(store.get().as_deref(), Some(token.as_str()));

        let stored = store.get().expect("stored");
        let decoded = ClaimsDecoder::decode(&stored).expect("decode");
        assert_eq!(decoded.roles(), claims.roles());

        let view = session.view();
        assert!(view.shows(Role::Admin));
        assert!(!view.shows(Role::Judge));
        assert!(!view.shows(Role::Participant));
        assert!(view.logout_visible());
    }

    #[tokio::test]
    async fn rejected_login_reports_backend_message() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(401).json_body(json!({"message": "bad credentials"}));
        });

        let (session, store) = controller(ClientConfig::new(server.base_url()));
        let err = session.login("a@b.com", "wrong").await.unwrap_err();

        assert_eq!(err.current_context().user_message(), "bad credentials");
        assert_eq!(store.get(), None);
        assert_eq!(session.state(), SessionState::LoggedOut);
        assert_eq!(session.view(), RoleGate::new().reset());
    }

    #[tokio::test]
    async fn rejected_login_without_message_uses_generic_text() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(500).body("Internal Server Error");
        });

        let (session, _store) = controller(ClientConfig::new(server.base_url()));
        let err = session.login("a@b.com", "x").await.unwrap_err();

        assert_eq!(
            err.current_context(),
            &LoginError::Rejected {
                status: 500,
                message: GENERIC_LOGIN_FAILURE.to_string(),
            }
        );
    }

    #[tokio::test]
    async fn undecodable_token_is_rolled_back() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(200).json_body(json!({"token": "a.b"}));
        });

        let (session, store) = controller(ClientConfig::new(server.base_url()));
        let err = session.login("a@b.com", "x").await.unwrap_err();

        assert!(matches!(
            err.current_context(),
            LoginError::MalformedCredential { .. }
        ));
        assert_eq!(store.get(), None);
        assert_eq!(session.state(), SessionState::LoggedOut);
    }

    #[tokio::test]
    async fn undecodable_token_restores_previous_credential() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(200).json_body(json!({"token": "not-a-token"}));
        });

        let previous = token_for(&json!({"roles": ["participant"]}));
        let store = Arc::new(MemoryCredentialStore::with_token(previous.clone()));
        let session = SessionController::new(
            ClientConfig::new(server.base_url()),
            store.clone(),
            reqwest::Client::new(),
        );
        session.restore();

        assert!(session.login("a@b.com", "x").await.is_err());
        assert_eq!(store.get(), Some(previous));
        assert_eq!(session.state(), SessionState::LoggedIn);
    }

    #[tokio::test]
    async fn success_without_token_is_malformed() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(200).json_body(json!({"message": "ok"}));
        });

        let (session, store) = controller(ClientConfig::new(server.base_url()));
        let err = session.login("a@b.com", "x").await.unwrap_err();
        assert!(matches!(
            err.current_context(),
            LoginError::MalformedCredential { .. }
        ));
        assert_eq!(store.get(), None);
    }

    #[tokio::test]
    async fn logout_after_login_drops_authorization() {
        let server = MockServer::start_async().await;
        let token = token_for(&json!({"roles": ["participant"]}));
        server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(200).json_body(json!({"token": token}));
        });
        let anonymous = server.mock(|when, then| {
            when.method(GET)
                .path("/participant/panel")
                .header_missing("Authorization");
            then.status(401).json_body(json!({"message": "missing token"}));
        });

        let (session, store) = controller(ClientConfig::new(server.base_url()));
        session.login("a@b.com", "x").await.expect("login");
        let requester = session.requester();

        let view = session.logout();
        assert_eq!(view, RoleGate::new().reset());
        assert_eq!(store.get(), None);

        let response = requester
            .send("/participant/panel", &RequestOptions::get())
            .await
            .expect("send");
        anonymous.assert();

        let err = response.error_for_status().unwrap_err();
        assert!(matches!(
            err.current_context(),
            RequestError::Unauthorized { .. }
        ));
    }

    #[tokio::test]
    async fn login_and_logout_advance_epoch() {
        let server = MockServer::start_async().await;
        let token = token_for(&json!({"roles": []}));
        server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(200).json_body(json!({"token": token}));
        });

        let (session, _store) = controller(ClientConfig::new(server.base_url()));
        let start = session.epoch();
        session.login("a@b.com", "x").await.expect("login");
        assert_eq!(session.epoch(), start + 1);
        session.logout();
        assert_eq!(session.epoch(), start + 2);
    }

    #[tokio::test]
    async fn rejected_login_with_blank_message_uses_generic_text() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(401).json_body(json!({"message": ""}));
        });

        let (session, _store) = controller(ClientConfig::new(server.base_url()));
        let err = session.login("a@b.com", "x").await.unwrap_err();

        assert_eq!(err.current_context().user_message(), GENERIC_LOGIN_FAILURE);
    }

    #[tokio::test]
    async fn logout_during_login_discards_the_response() {
        let server = MockServer::start_async().await;
        let token = token_for(&json!({"roles": ["admin"]}));
        server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(200)
                .delay(std::time::Duration::from_millis(300))
                .json_body(json!({"token": token}));
        });

        let (session, store) = controller(ClientConfig::new(server.base_url()));
        let logout = async {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            session.logout()
        };
        let (result, view) = tokio::join!(session.login("a@b.com", "x"), logout);

        assert!(!view.is_authenticated());
        assert_eq!(result.unwrap_err().current_context(), &LoginError::Superseded);
        assert_eq!(session.state(), SessionState::LoggedOut);
        assert_eq!(store.get(), None);
        assert_eq!(session.view(), RoleGate::new().reset());
    }

    #[test]
    fn unauthorized_keeps_session_by_default() {
        let store = Arc::new(MemoryCredentialStore::with_token(token_for(
            &json!({"roles": ["admin"]}),
        )));
        let session = SessionController::new(
            ClientConfig::new("http://localhost"),
            store.clone(),
            reqwest::Client::new(),
        );
        session.restore();

        assert_eq!(session.handle_unauthorized(), None);
        assert_eq!(session.state(), SessionState::LoggedIn);
        assert!(store.get().is_some());
    }

    #[test]
    fn unauthorized_logs_out_when_configured() {
        let store = Arc::new(MemoryCredentialStore::with_token(token_for(
            &json!({"roles": ["admin"]}),
        )));
        let session = SessionController::new(
            ClientConfig::builder("http://localhost")
                .logout_on_unauthorized(true)
                .build(),
            store.clone(),
            reqwest::Client::new(),
        );
        session.restore();

        assert_eq!(session.handle_unauthorized(), Some(RoleGate::new().reset()));
        assert_eq!(session.state(), SessionState::LoggedOut);
        assert_eq!(store.get(), None);
    }
}
