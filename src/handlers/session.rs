use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::errors::AppError;
use crate::identity;

/// Request body carrying the provider-verified subject id.
#[derive(Debug, Deserialize)]
pub struct SessionForm {
    pub user_id: String,
}

/// POST /api/v1/session - Store the verified subject in the session
///
/// Credential verification happens in the external identity provider;
/// this endpoint only records the subject it vouches for.
pub async fn sign_in(session: Session, body: web::Json<SessionForm>) -> Result<HttpResponse, AppError> {
    let user_id = body.user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::Validation(vec!["user_id is required".to_string()]));
    }

    session
        .insert("user_id", user_id)
        .map_err(|e| AppError::Session(format!("Failed to store session: {e}")))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "user_id": user_id })))
}

/// GET /api/v1/session - Echo the current viewer
pub async fn current(session: Session) -> Result<HttpResponse, AppError> {
    let user_id = identity::get_user_id(&session);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "user_id": user_id })))
}

/// DELETE /api/v1/session - Sign out
pub async fn sign_out(session: Session) -> Result<HttpResponse, AppError> {
    session.purge();
    Ok(HttpResponse::NoContent().finish())
}
