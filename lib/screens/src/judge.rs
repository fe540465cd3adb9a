//! Review and grading of participant submissions.

use std::sync::Arc;

use podium_core::Result;
use podium_session::SessionController;
use tracing::{info, instrument, warn};

use crate::client::ScreenClient;
use crate::error::ScreenError;
use crate::list::ListView;
use crate::models::{GradeRequest, ParticipantReview};

const REVIEW_PATH: &str = "/judge/review";
const GRADE_PATH: &str = "/judge/grade";

/// Screen backing the judge panel.
#[derive(Debug)]
pub struct JudgeScreen {
    client: ScreenClient,
    participants: ListView<ParticipantReview>,
}

impl JudgeScreen {
    /// Creates an empty judge screen bound to the session.
    #[must_use]
    pub fn new(session: Arc<SessionController>) -> Self {
        Self {
            client: ScreenClient::new(session),
            participants: ListView::new(),
        }
    }

    /// Returns the listed participants.
    #[must_use]
    pub fn participants(&self) -> &ListView<ParticipantReview> {
        &self.participants
    }

    /// Reloads participants and their submissions.
    ///
    /// # Errors
    ///
    /// Returns the request failure; the list keeps its previous rows.
    #[instrument(skip(self))]
    pub async fn load_participants(&mut self) -> Result<&ListView<ParticipantReview>, ScreenError> {
        let participants = self.client.fetch(REVIEW_PATH).await?;
        self.participants.replace(participants);
        Ok(&self.participants)
    }

    /// Records a grade and reloads the participant list.
    ///
    /// # Errors
    ///
    /// Returns the failure of the grade call itself.
    #[instrument(skip(self, grade), fields(user_id = %grade.user_id, submission_id = %grade.submission_id))]
    pub async fn submit_grade(&mut self, grade: &GradeRequest) -> Result<String, ScreenError> {
        let message = self.client.act(GRADE_PATH, grade).await?;
        info!(%message, "grade recorded");

        if let Err(e) = self.load_participants().await {
            warn!(error = %e, "failed to refresh participants");
        }
        Ok(message)
    }
}
