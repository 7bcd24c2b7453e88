use std::collections::HashMap;

use chrono::Utc;

use super::types::*;
use crate::db::{self, DbPool};
use crate::errors::AppError;
use crate::identity::Viewer;
use crate::models::poll_option::{self, PollOption};
use crate::models::question;
use crate::tally;
use crate::view;

const SUMMARY_SELECT: &str =
    "SELECT p.id, p.title, p.description, p.owner_user_id, p.status, p.end_date, p.created_at, \
            (SELECT COUNT(*) FROM poll_questions q WHERE q.poll_id = p.id) AS question_count, \
            (SELECT COUNT(*) FROM poll_votes v WHERE v.poll_id = p.id) AS vote_count \
     FROM polls p";

/// Create a poll with its questions and options in one transaction.
/// The new poll always starts unpublished; each question takes the
/// status supplied for it and its position from list order. Returns
/// the new poll id.
pub async fn create(pool: &DbPool, owner_user_id: &str, input: &NewPoll) -> Result<i64, AppError> {
    let created_at = db::now_rfc3339();
    let mut tx = pool.begin().await?;

    let poll_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO polls (title, description, owner_user_id, status, end_date, created_at) \
         VALUES (?1, ?2, ?3, 'unpublished', ?4, ?5) RETURNING id",
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(owner_user_id)
    .bind(&input.end_date)
    .bind(&created_at)
    .fetch_one(&mut *tx)
    .await?;

    for (position, new_question) in input.questions.iter().enumerate() {
        let question_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO poll_questions (poll_id, text, position, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
        )
        .bind(poll_id)
        .bind(&new_question.text)
        .bind(position as i64)
        .bind(new_question.status)
        .bind(&created_at)
        .fetch_one(&mut *tx)
        .await?;

        for text in &new_question.options {
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
    }

    tx.commit().await?;
    Ok(poll_id)
}

/// Find a poll row by id. Visibility is not applied here.
pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Poll>, AppError> {
    let poll = sqlx::query_as::<_, Poll>(
        "SELECT id, title, description, owner_user_id, status, end_date, created_at \
         FROM polls WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(poll)
}

/// Load a poll and require `caller` to own it. A poll the caller
/// cannot read reports NotFound rather than Unauthorized, so hidden
/// polls stay hidden even on mutation attempts.
pub async fn require_owner(pool: &DbPool, poll_id: i64, caller: &str) -> Result<Poll, AppError> {
    let poll = find_by_id(pool, poll_id).await?.ok_or(AppError::NotFound)?;
    let viewer = Viewer::User(caller.to_string());
    if view::can_manage(&poll, &viewer) {
        return Ok(poll);
    }
    if view::can_read(&poll, &viewer) {
        Err(AppError::Unauthorized)
    } else {
        Err(AppError::NotFound)
    }
}

/// Change a poll's status. Any transition between the three states is
/// allowed, but only for the owner.
pub async fn set_status(
    pool: &DbPool,
    poll_id: i64,
    caller: &str,
    status: PollStatus,
) -> Result<(), AppError> {
    require_owner(pool, poll_id, caller).await?;
    sqlx::query("UPDATE polls SET status = ?1 WHERE id = ?2")
        .bind(status)
        .bind(poll_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Replace a poll's editable fields (title, description, end date).
/// Status and ownership are not touched here.
pub async fn update_details(
    pool: &DbPool,
    poll_id: i64,
    caller: &str,
    form: &PollDetailsForm,
) -> Result<(), AppError> {
    require_owner(pool, poll_id, caller).await?;
    sqlx::query("UPDATE polls SET title = ?1, description = ?2, end_date = ?3 WHERE id = ?4")
        .bind(&form.title)
        .bind(&form.description)
        .bind(&form.end_date)
        .bind(poll_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Load the full poll view for `viewer`: questions filtered to what
/// the viewer may see, each with per-option tallies in stored order.
/// Hidden and absent polls both report NotFound.
pub async fn find_detail(pool: &DbPool, poll_id: i64, viewer: &Viewer) -> Result<PollDetail, AppError> {
    let poll = find_by_id(pool, poll_id).await?.ok_or(AppError::NotFound)?;
    if !view::can_read(&poll, viewer) {
        return Err(AppError::NotFound);
    }

    let questions = question::find_for_poll(pool, poll_id).await?;
    let visible = view::visible_questions(&poll, questions, viewer);

    let mut options_by_question: HashMap<i64, Vec<PollOption>> = HashMap::new();
    for option in poll_option::find_for_poll(pool, poll_id).await? {
        options_by_question.entry(option.question_id).or_default().push(option);
    }

    let expired = view::is_expired(&poll, Utc::now());

    let mut details = Vec::with_capacity(visible.len());
    for q in visible {
        let question_options = options_by_question.remove(&q.id).unwrap_or_default();
        details.push(QuestionDetail {
            id: q.id,
            text: q.text,
            position: q.position,
            status: q.status,
            total_votes: tally::question_total(&question_options),
            options: tally::build(&question_options),
        });
    }

    Ok(PollDetail {
        id: poll.id,
        title: poll.title,
        description: poll.description,
        owner_user_id: poll.owner_user_id,
        status: poll.status,
        end_date: poll.end_date,
        created_at: poll.created_at,
        expired,
        questions: details,
    })
}

/// List poll summaries for `viewer` under the given filter. The
/// owner-scoped filters return nothing for anonymous viewers.
pub async fn list(pool: &DbPool, filter: PollFilter, viewer: &Viewer) -> Result<Vec<PollSummary>, AppError> {
    let summaries = match filter {
        PollFilter::Published => {
            let sql = format!(
                "{} WHERE p.status = 'published' ORDER BY p.created_at DESC, p.id DESC",
                SUMMARY_SELECT
            );
            sqlx::query_as::<_, PollSummary>(&sql).fetch_all(pool).await?
        }
        PollFilter::Owned | PollFilter::OwnedUnpublished => {
            let user_id = match viewer.user_id() {
                Some(id) => id,
                None => return Ok(Vec::new()),
            };
            let sql = if filter == PollFilter::Owned {
                format!(
                    "{} WHERE p.owner_user_id = ?1 ORDER BY p.created_at DESC, p.id DESC",
                    SUMMARY_SELECT
                )
            } else {
                format!(
                    "{} WHERE p.owner_user_id = ?1 AND p.status = 'unpublished' \
                     ORDER BY p.created_at DESC, p.id DESC",
                    SUMMARY_SELECT
                )
            };
            sqlx::query_as::<_, PollSummary>(&sql)
                .bind(user_id)
                .fetch_all(pool)
                .await?
        }
        PollFilter::Active => {
            let sql = format!(
                "{} WHERE p.status = 'published' \
                 AND (p.end_date IS NULL OR datetime(p.end_date) > datetime(?1)) \
                 ORDER BY p.created_at DESC, p.id DESC",
                SUMMARY_SELECT
            );
            sqlx::query_as::<_, PollSummary>(&sql)
                .bind(db::now_rfc3339())
                .fetch_all(pool)
                .await?
        }
        PollFilter::Expired => {
            let sql = format!(
                "{} WHERE p.status = 'published' AND p.end_date IS NOT NULL \
                 AND datetime(p.end_date) <= datetime(?1) \
                 ORDER BY p.created_at DESC, p.id DESC",
                SUMMARY_SELECT
            );
            sqlx::query_as::<_, PollSummary>(&sql)
                .bind(db::now_rfc3339())
                .fetch_all(pool)
                .await?
        }
    };
    Ok(summaries)
}
