use serde::Serialize;
use serde_json::Value;

use crate::db::{self, DbPool};
use crate::errors::AppError;

/// One accepted mutation, as recorded.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: i64,
    pub user_id: String,
    pub action: String,
    pub target_type: String,
    pub target_id: i64,
    pub details: String,
    pub created_at: String,
}

/// Record an accepted mutation. Call sites discard the result; a
/// failed audit write is logged here and never fails the mutation
/// itself.
pub async fn log(
    pool: &DbPool,
    user_id: &str,
    action: &str,
    target_type: &str,
    target_id: i64,
    details: Value,
) -> Result<i64, AppError> {
    let result = sqlx::query_scalar::<_, i64>(
        "INSERT INTO audit_log (user_id, action, target_type, target_id, details, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id",
    )
    .bind(user_id)
    .bind(action)
    .bind(target_type)
    .bind(target_id)
    .bind(details.to_string())
    .bind(db::now_rfc3339())
    .fetch_one(pool)
    .await;

    match result {
        Ok(id) => Ok(id),
        Err(e) => {
            log::warn!("Audit write failed for {action}: {e}");
            Err(e.into())
        }
    }
}

/// The N most recent audit entries, newest first.
pub async fn find_recent(pool: &DbPool, limit: i64) -> Result<Vec<AuditEntry>, AppError> {
    let entries = sqlx::query_as::<_, AuditEntry>(
        "SELECT id, user_id, action, target_type, target_id, details, created_at \
         FROM audit_log ORDER BY created_at DESC, id DESC LIMIT ?1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}
