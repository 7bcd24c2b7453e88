use serde::{Deserialize, Serialize};

/// Option row as stored. `vote_count` is only ever changed by the
/// transactional increment that accompanies a vote insert, so it always
/// equals the number of vote records pointing at the option.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PollOption {
    pub id: i64,
    pub question_id: i64,
    pub poll_id: i64,
    pub text: String,
    pub vote_count: i64,
    pub created_at: String,
}
