use serde::{Deserialize, Serialize};

/// Vote ledger row. Append-only; at most one per (question, user).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VoteRecord {
    pub id: i64,
    pub poll_id: i64,
    pub question_id: i64,
    pub option_id: i64,
    pub user_id: String,
    pub created_at: String,
}

/// Request body for casting a vote within a poll.
#[derive(Debug, Clone, Deserialize)]
pub struct VoteForm {
    pub question_id: i64,
    pub option_id: i64,
}
