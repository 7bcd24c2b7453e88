use actix_session::Session;

use crate::errors::AppError;

/// The requesting principal. Identity is established by an external
/// provider; the session stores only the verified subject id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User(String),
}

impl Viewer {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(id) => Some(id),
        }
    }

    pub fn is_user(&self, user_id: &str) -> bool {
        matches!(self, Viewer::User(id) if id == user_id)
    }
}

pub fn get_user_id(session: &Session) -> Option<String> {
    session.get::<String>("user_id").unwrap_or(None)
}

pub fn viewer(session: &Session) -> Viewer {
    match get_user_id(session) {
        Some(id) => Viewer::User(id),
        None => Viewer::Anonymous,
    }
}

/// Resolve the signed-in subject; anonymous requests get a session error.
pub fn require_user(session: &Session) -> Result<String, AppError> {
    get_user_id(session).ok_or_else(|| AppError::Session("Not signed in".to_string()))
}
