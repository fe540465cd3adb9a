//! The participant's own submissions.

use std::sync::Arc;

use podium_core::{Result, UserId};
use podium_session::SessionController;
use tracing::{info, instrument, warn};

use crate::client::ScreenClient;
use crate::error::ScreenError;
use crate::list::ListView;
use crate::models::{NewSubmission, ParticipantPanel, SubmissionSummary};

const PANEL_PATH: &str = "/participant/panel";
const SUBMIT_PATH: &str = "/participant/submit";

/// Screen backing the participant panel.
#[derive(Debug)]
pub struct ParticipantScreen {
    client: ScreenClient,
    owner: Option<(UserId, String)>,
    submissions: ListView<SubmissionSummary>,
}

impl ParticipantScreen {
    /// Creates an empty participant screen bound to the session.
    #[must_use]
    pub fn new(session: Arc<SessionController>) -> Self {
        Self {
            client: ScreenClient::new(session),
            owner: None,
            submissions: ListView::new(),
        }
    }

    /// Returns the listed submissions.
    #[must_use]
    pub fn submissions(&self) -> &ListView<SubmissionSummary> {
        &self.submissions
    }

    /// Returns the id and email of the participant from the last load.
    #[must_use]
    pub fn owner(&self) -> Option<(UserId, &str)> {
        self.owner.as_ref().map(|(id, email)| (*id, email.as_str()))
    }

    /// Reloads the submission list.
    ///
    /// # Errors
    ///
    /// Returns the request failure; the list keeps its previous rows.
    #[instrument(skip(self))]
    pub async fn load_submissions(&mut self) -> Result<&ListView<SubmissionSummary>, ScreenError> {
        let panel: ParticipantPanel = self.client.fetch(PANEL_PATH).await?;
        self.owner = Some((panel.user_id, panel.email));
        self.submissions.replace(panel.submissions);
        Ok(&self.submissions)
    }

    /// Creates a submission and reloads the list.
    ///
    /// Returns the backend's confirmation. A failed reload after a
    /// successful submit is logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns the failure of the submit call itself.
    #[instrument(skip(self, content))]
    pub async fn create_submission(
        &mut self,
        title: &str,
        content: &str,
    ) -> Result<String, ScreenError> {
        let body = NewSubmission {
            title: title.to_string(),
            content: content.to_string(),
        };
        let message = self.client.act(SUBMIT_PATH, &body).await?;
        info!(%message, "submission created");

        if let Err(e) = self.load_submissions().await {
            warn!(error = %e, "failed to refresh submissions");
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

    #[tokio::test]
    async fn load_replaces_rows() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/participant/panel").header_exists("Authorization");
            then.status(200).json_body(json!({
                "user_id": 5,
                "email": "p@x.com",
                "submissions": [{"submission_id": 1, "title": "Example Project"}]
            }));
        });

        let (session, _store) = session_with_roles(ClientConfig::new(server.base_url()), &["participant"]);
        let mut screen = ParticipantScreen::new(session);

        let list = screen.load_submissions().await.expect("load");
        assert_eq!(list.lines(), vec!["ID: 1, Title: Example Project".to_string()]);
        assert_eq!(screen.owner(), Some((UserId::new(5), "p@x.com")));
    }

    #[tokio::test]
    async fn create_posts_and_reloads() {
        let server = MockServer::start_async().await;
        let submit = server.mock(|when, then| {
            when.method(POST)
                .path("/participant/submit")
                .json_body(json!({"title": "Solver", "content": "print(1)"}));
            then.status(200)
                .json_body(json!({"message": "Submission 'Solver' created for user 5"}));
        });
        let panel = server.mock(|when, then| {
            when.method(GET).path("/participant/panel");
            then.status(200).json_body(json!({
                "user_id": 5,
                "email": "p@x.com",
                "submissions": [{"submission_id": 2, "title": "Solver"}]
            }));
        });

        let (session, _store) = session_with_roles(ClientConfig::new(server.base_url()), &["participant"]);
        let mut screen = ParticipantScreen::new(session);

        let message = screen.create_submission("Solver", "print(1)").await.expect("create");
        submit.assert();
        panel.assert();
        assert_eq!(message, "Submission 'Solver' created for user 5");
        assert_eq!(screen.submissions().len(), 1);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_rows() {
        let server = MockServer::start_async().await;
        let mut ok = server.mock(|when, then| {
            when.method(GET).path("/participant/panel");
            then.status(200).json_body(json!({
                "user_id": 5, "email": "p@x.com",
                "submissions": [{"submission_id": 1, "title": "Kept"}]
            }));
        });

        let (session, _store) = session_with_roles(ClientConfig::new(server.base_url()), &["participant"]);
        let mut screen = ParticipantScreen::new(session);
        screen.load_submissions().await.expect("load");
        ok.delete();

        server.mock(|when, then| {
            when.method(GET).path("/participant/panel");
            then.status(404).json_body(json!({"message": "user not found"}));
        });
        let err = screen.load_submissions().await.unwrap_err();
        assert_eq!(err.current_context().user_message(), "user not found");
        assert_eq!(screen.submissions().lines(), vec!["ID: 1, Title: Kept".to_string()]);
    }
}
