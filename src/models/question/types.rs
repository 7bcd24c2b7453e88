use serde::{Deserialize, Serialize};

/// Question lifecycle status. Questions start inactive unless the
/// creation request says otherwise; only published questions accept
/// votes or appear to non-owners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum QuestionStatus {
    #[default]
    Inactive,
    Published,
}

/// Question row as stored. `position` is zero-based and unique within
/// the poll; it defines display order.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub poll_id: i64,
    pub text: String,
    pub position: i64,
    pub status: QuestionStatus,
    pub created_at: String,
}
