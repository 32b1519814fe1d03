use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::errors::AppError;

/// Fixed program-proposal taxonomy entry.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
}

pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Category>, AppError> {
    let rows = sqlx::query_as::<_, Category>(
        "SELECT id, name, description FROM proposal_categories ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn exists(pool: &SqlitePool, id: i64) -> Result<bool, AppError> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM proposal_categories WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(row.0 > 0)
}
