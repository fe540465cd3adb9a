//! Backend access shared by the screen controllers.

use std::sync::Arc;

use podium_core::Result;
use podium_session::{ApiResponse, AuthenticatedRequest, RequestError, RequestOptions, SessionController};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::error::ScreenError;

/// Message shown after an action whose response carried none.
pub const DEFAULT_ACTION_MESSAGE: &str = "Done";

/// Sends screen calls through the session's requester.
///
/// A completion is dropped as [`ScreenError::Stale`] when the session epoch
/// moved while the call was in flight. A 401 is reported to the session
/// before it is returned.
#[derive(Debug, Clone)]
pub struct ScreenClient {
    session: Arc<SessionController>,
    requester: AuthenticatedRequest,
}

impl ScreenClient {
    /// Creates a client bound to the given session.
    #[must_use]
    pub fn new(session: Arc<SessionController>) -> Self {
        let requester = session.requester();
        Self { session, requester }
    }

    /// Returns the session this client reports to.
    #[must_use]
    pub fn session(&self) -> &SessionController {
        &self.session
    }

    async fn call(&self, path: &str, options: &RequestOptions) -> Result<ApiResponse, ScreenError> {
        let epoch = self.session.epoch();
        let sent = self.requester.send(path, options).await;

        if self.session.epoch() != epoch {
            debug!(path, "discarding response from an ended session");
            return Err(ScreenError::Stale.into());
        }

        let response = sent.map_err(|e| ScreenError::from_request(&e))?;
        response.error_for_status().map_err(|e| {
            if matches!(e.current_context(), RequestError::Unauthorized { .. }) {
                self.session.handle_unauthorized();
            }
            warn!(path, error = %e, "screen request failed");
            ScreenError::from_request(&e).into()
        })
    }

    /// Loads and parses a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns `Stale` if the session changed, otherwise the request failure.
    #[instrument(skip(self))]
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ScreenError> {
        let response = self.call(path, &RequestOptions::get()).await?;
        response
            .json()
            .map_err(|e| ScreenError::from_request(&e).into())
    }

    /// Posts a JSON body and returns the backend's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns `Stale` if the session changed, otherwise the request failure.
    #[instrument(skip(self, body))]
    pub async fn act<B: Serialize>(&self, path: &str, body: &B) -> Result<String, ScreenError> {
        let body = serde_json::to_value(body).map_err(|e| {
            ScreenError::Request(RequestError::InvalidBody {
                details: e.to_string(),
            })
        })?;
        let response = self.call(path, &RequestOptions::post().json(body)).await?;
        Ok(response
            .message()
            .unwrap_or_else(|| DEFAULT_ACTION_MESSAGE.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use podium_session::{ClientConfig, CredentialStore, MemoryCredentialStore, SessionController};
    use serde_json::{Value, json};

    pub(crate) fn token_for(payload: &Value) -> String {
        format!("h.{}.s", URL_SAFE_NO_PAD.encode(payload.to_string()))
    }

    /// A restored session holding a token with the given roles.
    pub(crate) fn session_with_roles(
        config: ClientConfig,
        roles: &[&str],
    ) -> (Arc<SessionController>, Arc<MemoryCredentialStore>) {
        let token = token_for(&json!({"user_id": 1, "roles": roles}));
        let store = Arc::new(MemoryCredentialStore::with_token(token));
        let shared: Arc<dyn CredentialStore> = store.clone();
        let session = Arc::new(SessionController::new(config, shared, reqwest::Client::new()));
        session.restore();
        (session, store)
    }
}
