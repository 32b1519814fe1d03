use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::errors::AppError;

/// A persisted key-value setting for display and editing.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Setting {
    pub id: i64,
    pub name: String,
    pub value: String,
    pub label: String,
    pub description: String,
    pub setting_type: String, // "text", "number", "boolean"
}

pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Setting>, AppError> {
    let rows = sqlx::query_as::<_, Setting>(
        "SELECT id, name, value, label, description, setting_type
         FROM settings ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Get a single setting's value by name, returning a default if not found.
pub async fn get_value(pool: &SqlitePool, name: &str, default: &str) -> String {
    let row: Result<Option<(String,)>, _> =
        sqlx::query_as("SELECT value FROM settings WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await;
    match row {
        Ok(Some((value,))) => value,
        _ => default.to_string(),
    }
}

/// Boolean settings are stored as "true"/"false" strings.
pub async fn get_bool(pool: &SqlitePool, name: &str, default: bool) -> bool {
    let raw = get_value(pool, name, if default { "true" } else { "false" }).await;
    raw.trim().eq_ignore_ascii_case("true")
}

/// Update a setting's value by name. Unknown names are a validation error so
/// webhook configuration typos surface instead of creating stray keys.
pub async fn update_value(pool: &SqlitePool, name: &str, value: &str) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE settings SET value = $1 WHERE name = $2")
        .bind(value)
        .bind(name)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::Validation(format!("unknown setting '{name}'")));
    }
    Ok(())
}
