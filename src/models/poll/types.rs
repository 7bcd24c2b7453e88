use serde::{Deserialize, Serialize};

use crate::models::question::QuestionStatus;
use crate::tally::OptionTally;

/// Poll lifecycle status. Transitions between any two states are
/// allowed, but only for the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PollStatus {
    Unpublished,
    Published,
    Inactive,
}

/// Poll row as stored. `owner_user_id` is the identity provider's
/// subject string and never changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Poll {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub owner_user_id: String,
    pub status: PollStatus,
    pub end_date: Option<String>,
    pub created_at: String,
}

/// Poll as shown in list views, with aggregate counts instead of
/// nested questions.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PollSummary {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub owner_user_id: String,
    pub status: PollStatus,
    pub end_date: Option<String>,
    pub created_at: String,
    pub question_count: i64,
    pub vote_count: i64,
}

/// Which slice of polls a list request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollFilter {
    Published,
    Owned,
    OwnedUnpublished,
    Active,
    Expired,
}

/// Full poll view returned by detail reads, already filtered for the
/// requesting viewer.
#[derive(Debug, Clone, Serialize)]
pub struct PollDetail {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub owner_user_id: String,
    pub status: PollStatus,
    pub end_date: Option<String>,
    pub created_at: String,
    pub expired: bool,
    pub questions: Vec<QuestionDetail>,
}

/// One question inside a poll detail view, with per-option tallies.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionDetail {
    pub id: i64,
    pub text: String,
    pub position: i64,
    pub status: QuestionStatus,
    pub total_votes: i64,
    pub options: Vec<OptionTally>,
}

/// Request body for creating a poll with its questions and options.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPoll {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub end_date: Option<String>,
    pub questions: Vec<NewQuestion>,
}

/// One question in a poll creation or add-question request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    pub text: String,
    pub options: Vec<String>,
    #[serde(default)]
    pub status: QuestionStatus,
}

/// Request body for editing a poll's title, description and end date.
/// The three fields replace the stored values as a unit.
#[derive(Debug, Clone, Deserialize)]
pub struct PollDetailsForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub end_date: Option<String>,
}
