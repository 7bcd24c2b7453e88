use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::identity::{self, require_user};
use crate::models::poll;
use crate::models::poll::{NewPoll, PollDetailsForm, PollFilter, PollStatus};
use crate::validate;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    filter: Option<PollFilter>,
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: PollStatus,
}

/// GET /api/v1/polls - List poll summaries
/// Query params: filter (published|owned|owned_unpublished|active|expired), default published
pub async fn list(
    pool: web::Data<DbPool>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let viewer = identity::viewer(&session);
    let filter = query.filter.unwrap_or(PollFilter::Published);

    let polls = poll::list(&pool, filter, &viewer).await?;

    Ok(HttpResponse::Ok().json(polls))
}

/// GET /api/v1/polls/{id} - Poll detail with questions and tallies
pub async fn detail(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let viewer = identity::viewer(&session);

    let detail = poll::find_detail(&pool, path.into_inner(), &viewer).await?;

    Ok(HttpResponse::Ok().json(detail))
}

/// POST /api/v1/polls - Create a poll with its questions and options
pub async fn create(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<NewPoll>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;

    let errors = validate::validate_new_poll(&body);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let poll_id = poll::create(&pool, &user_id, &body).await?;

    let details = serde_json::json!({
        "title": body.title,
        "questions": body.questions.len(),
        "summary": "Poll created"
    });
    let _ = crate::audit::log(&pool, &user_id, "poll.created", "poll", poll_id, details).await;

    Ok(HttpResponse::Created().json(serde_json::json!({ "id": poll_id })))
}

/// PUT /api/v1/polls/{id} - Update title, description and end date
pub async fn update_details(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<PollDetailsForm>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let poll_id = path.into_inner();

    let errors = validate::validate_poll_details(&body);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    poll::update_details(&pool, poll_id, &user_id, &body).await?;

    let details = serde_json::json!({
        "title": body.title,
        "summary": "Poll details updated"
    });
    let _ = crate::audit::log(&pool, &user_id, "poll.updated", "poll", poll_id, details).await;

    let viewer = identity::viewer(&session);
    let updated = poll::find_detail(&pool, poll_id, &viewer).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// PUT /api/v1/polls/{id}/status - Publish, unpublish or retire a poll
pub async fn set_status(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<StatusForm>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let poll_id = path.into_inner();

    poll::set_status(&pool, poll_id, &user_id, body.status).await?;

    let details = serde_json::json!({
        "status": body.status,
        "summary": "Poll status changed"
    });
    let _ = crate::audit::log(&pool, &user_id, "poll.status_changed", "poll", poll_id, details).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": poll_id, "status": body.status })))
}
