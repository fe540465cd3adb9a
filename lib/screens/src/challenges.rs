//! Public challenge board and submission history.

use std::sync::Arc;

use podium_core::Result;
use podium_session::SessionController;
use tracing::instrument;

use crate::client::ScreenClient;
use crate::error::ScreenError;
use crate::list::ListView;
use crate::models::{Challenge, ChallengeListing, SubmissionRecord, SubmissionRecords};

const CHALLENGES_PATH: &str = "/api/challenges";
const SUBMISSIONS_PATH: &str = "/api/submissions";

/// Screen listing open challenges.
#[derive(Debug)]
pub struct ChallengeBoard {
    client: ScreenClient,
    challenges: ListView<Challenge>,
}

impl ChallengeBoard {
    /// Creates an empty board bound to the session.
    #[must_use]
    pub fn new(session: Arc<SessionController>) -> Self {
        Self {
            client: ScreenClient::new(session),
            challenges: ListView::new(),
        }
    }

    /// Returns the listed challenges.
    #[must_use]
    pub fn challenges(&self) -> &ListView<Challenge> {
        &self.challenges
    }

    /// Reloads the challenge list.
    ///
    /// # Errors
    ///
    /// Returns the request failure; the list keeps its previous rows.
    #[instrument(skip(self))]
    pub async fn load_challenges(&mut self) -> Result<&ListView<Challenge>, ScreenError> {
        let listing: ChallengeListing = self.client.fetch(CHALLENGES_PATH).await?;
        self.challenges.replace(listing.into_challenges());
        Ok(&self.challenges)
    }
}

/// Screen listing uploaded submissions, newest first as served.
#[derive(Debug)]
pub struct SubmissionHistory {
    client: ScreenClient,
    submissions: ListView<SubmissionRecord>,
}

impl SubmissionHistory {
    /// Creates an empty history bound to the session.
    #[must_use]
    pub fn new(session: Arc<SessionController>) -> Self {
        Self {
            client: ScreenClient::new(session),
            submissions: ListView::new(),
        }
    }

    /// Returns the listed submissions.
    #[must_use]
    pub fn submissions(&self) -> &ListView<SubmissionRecord> {
        &self.submissions
    }

    /// Reloads the submission history.
    ///
    /// # Errors
    ///
    /// Returns the request failure; the list keeps its previous rows.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<&ListView<SubmissionRecord>, ScreenError> {
        let records: SubmissionRecords = self.client.fetch(SUBMISSIONS_PATH).await?;
        self.submissions.replace(records.submissions);
        Ok(&self.submissions)
    }
}
