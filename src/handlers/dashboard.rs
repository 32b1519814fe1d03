use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::dashboard;

/// GET /api/dashboard — derived statistics for the admin dashboard.
pub async fn index(pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let stats = dashboard::load(&pool).await?;
    Ok(HttpResponse::Ok().json(stats))
}
