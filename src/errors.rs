use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

/// Application error type. The last four variants are expected business
/// outcomes that propagate unchanged to the API layer; `Db` is a storage
/// failure and is never conflated with them.
#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Session(String),
    Validation(Vec<String>),
    NotFound,
    Unauthorized,
    NotPublished,
    AlreadyVoted,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Validation(errors) => write!(f, "Validation failed: {}", errors.join("; ")),
            AppError::NotFound => write!(f, "Not found"),
            AppError::Unauthorized => write!(f, "Not authorized"),
            AppError::NotPublished => write!(f, "Question is not open for voting"),
            AppError::AlreadyVoted => write!(f, "Already voted on this question"),
        }
    }
}

impl AppError {
    /// Stable machine-readable code for API error bodies.
    fn code(&self) -> &'static str {
        match self {
            AppError::Db(_) => "internal",
            AppError::Session(_) => "unauthenticated",
            AppError::Validation(_) => "invalid_request",
            AppError::NotFound => "not_found",
            AppError::Unauthorized => "unauthorized",
            AppError::NotPublished => "not_published",
            AppError::AlreadyVoted => "already_voted",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Session(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::FORBIDDEN,
            AppError::NotPublished | AppError::AlreadyVoted => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Storage failures are logged in full but surfaced generically.
        let message = match self {
            AppError::Db(_) => {
                log::error!("{self}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.code(),
            "message": message,
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}
