use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::db::DbPool;
use crate::errors::AppError;
use crate::identity::{get_user_id, require_user};
use crate::models::vote;
use crate::models::vote::VoteForm;

/// POST /api/v1/polls/{id}/votes - Cast a vote on one question
pub async fn cast(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<VoteForm>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let poll_id = path.into_inner();

    let vote_id = vote::cast(&pool, poll_id, body.question_id, body.option_id, &user_id).await?;

    let details = serde_json::json!({
        "poll_id": poll_id,
        "question_id": body.question_id,
        "option_id": body.option_id,
        "summary": "Vote cast"
    });
    let _ = crate::audit::log(&pool, &user_id, "vote.cast", "vote", vote_id, details).await;

    Ok(HttpResponse::Created().json(serde_json::json!({ "id": vote_id })))
}

/// GET /api/v1/polls/{id}/my-votes - The caller's votes within a poll
///
/// Anonymous callers get an empty list rather than an error, so the
/// UI can render a poll before sign-in completes.
pub async fn my_votes(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let poll_id = path.into_inner();

    let votes = match get_user_id(&session) {
        Some(user_id) => vote::find_for_user(&pool, poll_id, &user_id).await?,
        None => Vec::new(),
    };

    Ok(HttpResponse::Ok().json(votes))
}
