use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::identity::require_user;
use crate::models::poll::NewQuestion;
use crate::models::question;
use crate::models::question::QuestionStatus;
use crate::validate;

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: QuestionStatus,
}

/// POST /api/v1/polls/{id}/questions - Append a question to a poll
pub async fn add(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<NewQuestion>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let poll_id = path.into_inner();

    let errors = validate::validate_question(&body, "Question");
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let question_id = question::add(&pool, poll_id, &user_id, &body).await?;

    let details = serde_json::json!({
        "poll_id": poll_id,
        "text": body.text,
        "summary": "Question added"
    });
    let _ = crate::audit::log(&pool, &user_id, "question.added", "question", question_id, details).await;

    Ok(HttpResponse::Created().json(serde_json::json!({ "id": question_id })))
}

/// PUT /api/v1/questions/{id}/status - Publish or deactivate a question
pub async fn set_status(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<StatusForm>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let question_id = path.into_inner();

    question::set_status(&pool, question_id, &user_id, body.status).await?;

    let details = serde_json::json!({
        "status": body.status,
        "summary": "Question status changed"
    });
    let _ = crate::audit::log(&pool, &user_id, "question.status_changed", "question", question_id, details)
        .await;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": question_id, "status": body.status })))
}
