use chrono::Utc;

use super::types::*;
use crate::db::{self, DbPool};
use crate::errors::AppError;
use crate::identity::Viewer;
use crate::models::{poll, poll_option, question};
use crate::view;

/// Record a vote by `user_id` on one option of a question.
///
/// Preconditions are checked in a fixed order: the question must
/// belong to the poll (NotFound), the poll must be readable by the
/// voter (NotFound, existence hidden), voting must be open
/// (NotPublished), and the option must belong to the question
/// (NotFound). The vote row and the counter increment commit in one
/// transaction; the unique index on (question_id, user_id) decides
/// concurrent duplicates, so every losing attempt gets AlreadyVoted
/// no matter how the calls interleave. Returns the new vote id.
pub async fn cast(
    pool: &DbPool,
    poll_id: i64,
    question_id: i64,
    option_id: i64,
    user_id: &str,
) -> Result<i64, AppError> {
    let question = question::find_by_id(pool, question_id)
        .await?
        .filter(|q| q.poll_id == poll_id)
        .ok_or(AppError::NotFound)?;
    let poll = poll::find_by_id(pool, poll_id).await?.ok_or(AppError::NotFound)?;

    let viewer = Viewer::User(user_id.to_string());
    if !view::can_read(&poll, &viewer) {
        return Err(AppError::NotFound);
    }
    if !view::voting_open(&poll, &question, Utc::now()) {
        return Err(AppError::NotPublished);
    }
    if poll_option::find_in_question(pool, option_id, question_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let created_at = db::now_rfc3339();
    let mut tx = pool.begin().await?;

    // The INSERT comes first so the write transaction starts at the
    // serialization point instead of upgrading from a read snapshot.
    let vote_id = match sqlx::query_scalar::<_, i64>(
        "INSERT INTO poll_votes (poll_id, question_id, option_id, user_id, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
    )
    .bind(poll_id)
    .bind(question_id)
    .bind(option_id)
    .bind(user_id)
    .bind(&created_at)
    .fetch_one(&mut *tx)
    .await
    {
        Ok(id) => id,
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(AppError::AlreadyVoted);
        }
        Err(e) => return Err(e.into()),
    };

    sqlx::query("UPDATE poll_options SET vote_count = vote_count + 1 WHERE id = ?1")
        .bind(option_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(vote_id)
}

/// All votes `user_id` has cast within one poll, in question order.
pub async fn find_for_user(
    pool: &DbPool,
    poll_id: i64,
    user_id: &str,
) -> Result<Vec<VoteRecord>, AppError> {
    let votes = sqlx::query_as::<_, VoteRecord>(
        "SELECT id, poll_id, question_id, option_id, user_id, created_at \
         FROM poll_votes WHERE poll_id = ?1 AND user_id = ?2 ORDER BY question_id ASC",
    )
    .bind(poll_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(votes)
}
