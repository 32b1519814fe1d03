use serde_json::Value;
use sqlx::SqlitePool;

use crate::errors::AppError;

/// Append one audit entry. Callers ignore the result deliberately: an audit
/// failure must never fail the action being audited.
pub async fn log(
    pool: &SqlitePool,
    user_id: i64,
    action: &str,
    target_type: &str,
    target_id: i64,
    details: Value,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO audit_log (user_id, action, target_type, target_id, details)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(user_id)
    .bind(action)
    .bind(target_type)
    .bind(target_id)
    .bind(details.to_string())
    .execute(pool)
    .await?;
    Ok(())
}
