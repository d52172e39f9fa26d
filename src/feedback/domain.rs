//! Domain types for feedback tickets.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, user::UserID};

/// Alias for ids for the feedback table.
pub type FeedbackId = i64;

/// What sort of feedback the user is sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Bug,
    Suggestion,
    Other,
}

impl FeedbackKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            FeedbackKind::Bug => "bug",
            FeedbackKind::Suggestion => "suggestion",
            FeedbackKind::Other => "other",
        }
    }

    pub(crate) fn from_str(value: &str) -> Self {
        match value {
            "bug" => FeedbackKind::Bug,
            "suggestion" => FeedbackKind::Suggestion,
            _ => FeedbackKind::Other,
        }
    }
}

/// Where a ticket sits in the triage queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    Pending,
    InProgress,
    Resolved,
}

impl FeedbackStatus {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            FeedbackStatus::Pending => "pending",
            FeedbackStatus::InProgress => "in_progress",
            FeedbackStatus::Resolved => "resolved",
        }
    }

    pub(crate) fn from_str(value: &str) -> Self {
        match value {
            "in_progress" => FeedbackStatus::InProgress,
            "resolved" => FeedbackStatus::Resolved,
            _ => FeedbackStatus::Pending,
        }
    }
}

/// A feedback ticket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub user_id: UserID,
    pub kind: FeedbackKind,
    pub description: String,
    /// Public URLs of previously uploaded attachments.
    pub attachments: Vec<String>,
    pub status: FeedbackStatus,
    pub created_at: OffsetDateTime,
}

/// The client-supplied fields for creating a feedback ticket.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackData {
    pub kind: FeedbackKind,
    pub description: String,
    #[serde(default)]
    pub attachments: Vec<String>,
}

impl FeedbackData {
    /// Validate the client-supplied fields.
    pub fn validate(&self) -> Result<(), Error> {
        if self.description.trim().is_empty() {
            return Err(Error::validation(
                "description",
                "required",
                "a description is required",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod feedback_data_tests {
    use crate::Error;

    use super::{FeedbackData, FeedbackKind};

    #[test]
    fn blank_description_fails() {
        let data = FeedbackData {
            kind: FeedbackKind::Bug,
            description: "  ".to_owned(),
            attachments: Vec::new(),
        };

        assert!(matches!(data.validate(), Err(Error::Validation(_))));
    }
}
