use super::types::*;
use crate::db::DbPool;
use crate::errors::AppError;

/// All options of a poll, grouped by question in stored order.
pub async fn find_for_poll(pool: &DbPool, poll_id: i64) -> Result<Vec<PollOption>, AppError> {
    let options = sqlx::query_as::<_, PollOption>(
        "SELECT id, question_id, poll_id, text, vote_count, created_at \
         FROM poll_options WHERE poll_id = ?1 ORDER BY question_id ASC, id ASC",
    )
    .bind(poll_id)
    .fetch_all(pool)
    .await?;
    Ok(options)
}

/// All options of one question in stored order.
pub async fn find_for_question(pool: &DbPool, question_id: i64) -> Result<Vec<PollOption>, AppError> {
    let options = sqlx::query_as::<_, PollOption>(
        "SELECT id, question_id, poll_id, text, vote_count, created_at \
         FROM poll_options WHERE question_id = ?1 ORDER BY id ASC",
    )
    .bind(question_id)
    .fetch_all(pool)
    .await?;
    Ok(options)
}

/// Find an option by id, requiring it to belong to the given question.
pub async fn find_in_question(
    pool: &DbPool,
    option_id: i64,
    question_id: i64,
) -> Result<Option<PollOption>, AppError> {
    let option = sqlx::query_as::<_, PollOption>(
        "SELECT id, question_id, poll_id, text, vote_count, created_at \
         FROM poll_options WHERE id = ?1 AND question_id = ?2",
    )
    .bind(option_id)
    .bind(question_id)
    .fetch_optional(pool)
    .await?;
    Ok(option)
}
