//! Response and request bodies of the contest backend.
//!
//! `Display` on each row type yields the one-line summary a screen shows.

use std::fmt;

use podium_core::{SubmissionId, UserId};
use serde::{Deserialize, Serialize};

/// A submission as listed on participant and judge screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub submission_id: SubmissionId,
    pub title: String,
}

impl fmt::Display for SubmissionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID: {}, Title: {}", self.submission_id, self.title)
    }
}

/// Body of `GET /participant/panel`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParticipantPanel {
    pub user_id: UserId,
    pub email: String,
    #[serde(default)]
    pub submissions: Vec<SubmissionSummary>,
}

/// A new submission for `POST /participant/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSubmission {
    pub title: String,
    pub content: String,
}

/// One participant in the body of `GET /judge/review`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParticipantReview {
    pub user_id: UserId,
    pub email: String,
    #[serde(default)]
    pub submissions: Vec<SubmissionSummary>,
}

impl fmt::Display for ParticipantReview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let submissions = self
            .submissions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" | ");
        write!(
            f,
            "Participant ID: {}, Email: {}, Submissions: {submissions}",
            self.user_id, self.email
        )
    }
}

/// Body of `POST /judge/grade`.
///
/// The grade is free text; the backend stores whatever the judge entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeRequest {
    pub user_id: UserId,
    pub submission_id: SubmissionId,
    pub grade: String,
    pub comment: String,
}

impl GradeRequest {
    /// Creates a grade with no comment.
    #[must_use]
    pub fn new(user_id: UserId, submission_id: SubmissionId, grade: impl Into<String>) -> Self {
        Self {
            user_id,
            submission_id,
            grade: grade.into(),
            comment: String::new(),
        }
    }

    /// Attaches a comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// One account in the body of `GET /admin/users`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl fmt::Display for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Email: {}, Roles: {}",
            self.id,
            self.email,
            self.roles.join(", ")
        )
    }
}

/// A contest challenge.
///
/// The backend names it `title`; older payloads use `name`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Challenge {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub submission_time: Option<String>,
    #[serde(default)]
    pub expected_columns: Vec<String>,
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.description)?;
        if let Some(category) = &self.category {
            write!(f, " | Category: {category}")?;
        }
        if !self.languages.is_empty() {
            write!(f, " | Languages: {}", self.languages.join(", "))?;
        }
        if let Some(time) = &self.submission_time {
            write!(f, " | Submission Time: {time}")?;
        }
        if !self.expected_columns.is_empty() {
            write!(f, " | Columns: {}", self.expected_columns.join(", "))?;
        }
        Ok(())
    }
}

/// Body of `GET /api/challenges`, in either shape the backend has served.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ChallengeListing {
    Bare(Vec<Challenge>),
    Wrapped { challenges: Vec<Challenge> },
}

impl ChallengeListing {
    /// Returns the challenges regardless of shape.
    #[must_use]
    pub fn into_challenges(self) -> Vec<Challenge> {
        match self {
            Self::Bare(challenges) | Self::Wrapped { challenges } => challenges,
        }
    }
}

/// One uploaded file in the body of `GET /api/submissions`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    #[serde(default)]
    pub user_id: Option<String>,
    pub challenge_id: String,
    pub original_filename: String,
    pub status: String,
    pub created_at: String,
}

impl fmt::Display for SubmissionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Challenge: {}, File: {}, Status: {}, Submitted: {}",
            self.id, self.challenge_id, self.original_filename, self.status, self.created_at
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct SubmissionRecords {
    #[serde(default)]
    pub submissions: Vec<SubmissionRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn review_summary_joins_submissions() {
        let review: ParticipantReview = serde_json::from_value(json!({
            "user_id": 4,
            "email": "p@x.com",
            "submissions": [
                {"submission_id": 1, "title": "Example Project"},
                {"submission_id": 2, "title": "Second"}
            ]
        }))
        .expect("deserialize");

        assert_eq!(
            review.to_string(),
            "Participant ID: 4, Email: p@x.com, Submissions: ID: 1, Title: Example Project | ID: 2, Title: Second"
        );
    }

    #[test]
    fn user_summary_lists_roles() {
        let user: UserRecord = serde_json::from_value(json!({
            "id": 1, "email": "a@b.com", "roles": ["admin", "judge"]
        }))
        .expect("deserialize");
        assert_eq!(user.to_string(), "ID: 1, Email: a@b.com, Roles: admin, judge");
    }

    #[test]
    fn challenge_listing_accepts_both_shapes() {
        let bare: ChallengeListing = serde_json::from_value(json!([
            {"name": "Sorting", "description": "Sort it", "category": "algorithms",
             "languages": ["rust", "python"], "submission_time": "48h"}
        ]))
        .expect("bare");
        let wrapped: ChallengeListing = serde_json::from_value(json!({
            "status": "ok",
            "challenges": [
                {"id": "house_price", "title": "House Price Prediction",
                 "description": "Submit predicted prices for each id.",
                 "expected_columns": ["id", "prediction"], "order_matters": true}
            ]
        }))
        .expect("wrapped");

        let bare = bare.into_challenges();
        assert_eq!(
            bare[0].to_string(),
            "Sorting: Sort it | Category: algorithms | Languages: rust, python | Submission Time: 48h"
        );

        let wrapped = wrapped.into_challenges();
        assert_eq!(wrapped[0].name, "House Price Prediction");
        assert_eq!(wrapped[0].id.as_deref(), Some("house_price"));
        assert_eq!(wrapped[0].expected_columns, vec!["id", "prediction"]);
    }

    #[test]
    fn grade_request_serializes_numeric_ids() {
        let grade = GradeRequest::new(UserId::new(3), SubmissionId::new(9), "A").with_comment("nice");
        assert_eq!(
            serde_json::to_value(&grade).expect("serialize"),
            json!({"user_id": 3, "submission_id": 9, "grade": "A", "comment": "nice"})
        );
    }
}
