use super::types::*;
use crate::db::{self, DbPool};
use crate::errors::AppError;
use crate::models::poll::{self, NewQuestion};

/// Find a question row by id.
pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Question>, AppError> {
    let question = sqlx::query_as::<_, Question>(
        "SELECT id, poll_id, text, position, status, created_at \
         FROM poll_questions WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(question)
}

/// All questions of a poll in display order.
pub async fn find_for_poll(pool: &DbPool, poll_id: i64) -> Result<Vec<Question>, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        "SELECT id, poll_id, text, position, status, created_at \
         FROM poll_questions WHERE poll_id = ?1 ORDER BY position ASC",
    )
    .bind(poll_id)
    .fetch_all(pool)
    .await?;
    Ok(questions)
}

/// Change a question's status. Owner-gated through the parent poll;
/// both directions are allowed.
pub async fn set_status(
    pool: &DbPool,
    question_id: i64,
    caller: &str,
    status: QuestionStatus,
) -> Result<(), AppError> {
    let question = find_by_id(pool, question_id).await?.ok_or(AppError::NotFound)?;
    poll::require_owner(pool, question.poll_id, caller).await?;
    sqlx::query("UPDATE poll_questions SET status = ?1 WHERE id = ?2")
        .bind(status)
        .bind(question_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Append a question with its options to an existing poll. The new
/// question takes the next free position. Returns the new question id.
pub async fn add(
    pool: &DbPool,
    poll_id: i64,
    caller: &str,
    input: &NewQuestion,
) -> Result<i64, AppError> {
    poll::require_owner(pool, poll_id, caller).await?;

    let created_at = db::now_rfc3339();
    let mut tx = pool.begin().await?;

    // Position is assigned inside the INSERT so concurrent appends to
    // one poll cannot pick the same slot.
    let question_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO poll_questions (poll_id, text, position, status, created_at) \
         VALUES (?1, ?2, \
                 (SELECT COALESCE(MAX(position) + 1, 0) FROM poll_questions WHERE poll_id = ?1), \
                 ?3, ?4) RETURNING id",
    )
    .bind(poll_id)
    .bind(&input.text)
    .bind(input.status)
    .bind(&created_at)
    .fetch_one(&mut *tx)
    .await?;

    for text in &input.options {
        sqlx::query(
            "INSERT INTO poll_options (question_id, poll_id, text, vote_count, created_at) \
             VALUES (?1, ?2, ?3, 0, ?4)",
        )
        .bind(question_id)
        .bind(poll_id)
        .bind(text)
        .bind(&created_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(question_id)
}
