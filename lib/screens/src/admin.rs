//! User and role administration.

use std::sync::Arc;

use podium_core::{Result, UserId};
use podium_session::{Role, SessionController};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::client::ScreenClient;
use crate::error::ScreenError;
use crate::list::ListView;
use crate::models::UserRecord;

const USERS_PATH: &str = "/admin/users";
const ASSIGN_ROLE_PATH: &str = "/admin/assign-role";
const REMOVE_ROLE_PATH: &str = "/admin/remove-role";
const DELETE_USER_PATH: &str = "/admin/delete-user";

#[derive(Serialize)]
struct RoleChange<'a> {
    user_id: UserId,
    role: &'a str,
}

#[derive(Serialize)]
struct UserRef {
    user_id: UserId,
}

/// Screen backing the admin panel.
#[derive(Debug)]
pub struct AdminScreen {
    client: ScreenClient,
    users: ListView<UserRecord>,
}

impl AdminScreen {
    /// Creates an empty admin screen bound to the session.
    #[must_use]
    pub fn new(session: Arc<SessionController>) -> Self {
        Self {
            client: ScreenClient::new(session),
            users: ListView::new(),
        }
    }

    /// Returns the listed accounts.
    #[must_use]
    pub fn users(&self) -> &ListView<UserRecord> {
        &self.users
    }

    /// Reloads all accounts.
    ///
    /// # Errors
    ///
    /// Returns the request failure; the list keeps its previous rows.
    #[instrument(skip(self))]
    pub async fn load_users(&mut self) -> Result<&ListView<UserRecord>, ScreenError> {
        let users = self.client.fetch(USERS_PATH).await?;
        self.users.replace(users);
        Ok(&self.users)
    }

    /// Grants a role to an account.
    ///
    /// # Errors
    ///
    /// Returns the failure of the assign call.
    pub async fn assign_role(&mut self, user_id: UserId, role: Role) -> Result<String, ScreenError> {
        self.change(ASSIGN_ROLE_PATH, &RoleChange { user_id, role: role.as_str() })
            .await
    }

    /// Revokes a role from an account.
    ///
    /// # Errors
    ///
    /// Returns the failure of the remove call.
    pub async fn remove_role(&mut self, user_id: UserId, role: Role) -> Result<String, ScreenError> {
        self.change(REMOVE_ROLE_PATH, &RoleChange { user_id, role: role.as_str() })
            .await
    }

    /// Deletes an account.
    ///
    /// # Errors
    ///
    /// Returns the failure of the delete call.
    pub async fn delete_user(&mut self, user_id: UserId) -> Result<String, ScreenError> {
        self.change(DELETE_USER_PATH, &UserRef { user_id }).await
    }

    #[instrument(skip(self, body))]
    async fn change<B: Serialize>(&mut self, path: &str, body: &B) -> Result<String, ScreenError> {
        let message = self.client.act(path, body).await?;
        info!(%message, "account changed");

        if let Err(e) = self.load_users().await {
            warn!(error = %e, "failed to refresh users");
        }
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::session_with_roles;
    use httpmock::prelude::*;
    use podium_session::ClientConfig;
    use serde_json::json;

    fn users_mock(server: &MockServer) -> httpmock::Mock<'_> {
        server.mock(|when, then| {
            when.method(GET).path("/admin/users");
            then.status(200).json_body(json!([
                {"id": 1, "email": "a@b.com", "roles": ["admin"]},
                {"id": 2, "email": "p@x.com", "roles": ["participant", "judge"]}
            ]));
        })
    }

    #[tokio::test]
    async fn load_lists_users() {
        let server = MockServer::start_async().await;
        users_mock(&server);

        let (session, _store) = session_with_roles(ClientConfig::new(server.base_url()), &["admin"]);
        let mut screen = AdminScreen::new(session);

        let list = screen.load_users().await.expect("load");
        assert_eq!(
            list.lines(),
            vec![
                "ID: 1, Email: a@b.com, Roles: admin".to_string(),
                "ID: 2, Email: p@x.com, Roles: participant, judge".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn role_changes_post_lowercase_tags() {
        let server = MockServer::start_async().await;
        let assign = server.mock(|when, then| {
            when.method(POST)
                .path("/admin/assign-role")
                .json_body(json!({"user_id": 2, "role": "judge"}));
            then.status(200)
                .json_body(json!({"message": "role 'judge' added to user p@x.com"}));
        });
        let remove = server.mock(|when, then| {
            when.method(POST)
                .path("/admin/remove-role")
                .json_body(json!({"user_id": 2, "role": "participant"}));
            then.status(200)
                .json_body(json!({"message": "role 'participant' removed from user p@x.com"}));
        });
        let users = users_mock(&server);

        let (session, _store) = session_with_roles(ClientConfig::new(server.base_url()), &["admin"]);
        let mut screen = AdminScreen::new(session);

        let added = screen.assign_role(UserId::new(2), Role::Judge).await.expect("assign");
        let removed = screen
            .remove_role(UserId::new(2), Role::Participant)
            .await
            .expect("remove");

        assign.assert();
        remove.assert();
        users.assert_calls(2);
        assert_eq!(added, "role 'judge' added to user p@x.com");
        assert_eq!(removed, "role 'participant' removed from user p@x.com");
    }

    #[tokio::test]
    async fn delete_unknown_user_reports_not_found() {
        let server = MockServer::start_async().await;
        let delete = server.mock(|when, then| {
            when.method(POST)
                .path("/admin/delete-user")
                .json_body(json!({"user_id": 42}));
            then.status(404).json_body(json!({"message": "user not found"}));
        });

        let (session, _store) = session_with_roles(ClientConfig::new(server.base_url()), &["admin"]);
        let mut screen = AdminScreen::new(session);

        let err = screen.delete_user(UserId::new(42)).await.unwrap_err();
        delete.assert();
        assert_eq!(err.current_context().user_message(), "user not found");
        assert_eq!(err.current_context().request().and_then(|e| e.status()), Some(404));
    }
}
