use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::audit;
use crate::errors::AppError;
use crate::models::setting;

#[derive(Debug, Deserialize)]
pub struct SettingForm {
    pub value: String,
}

/// GET /api/settings
pub async fn list(pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let settings = setting::find_all(&pool).await?;
    Ok(HttpResponse::Ok().json(settings))
}

/// PUT /api/settings/{name} — simple key-value toggle persistence.
pub async fn save(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
    form: web::Json<SettingForm>,
) -> Result<HttpResponse, AppError> {
    let name = path.into_inner();
    setting::update_value(&pool, &name, form.value.trim()).await?;

    let details = serde_json::json!({
        "name": name,
        "value": form.value.trim(),
        "summary": format!("Updated setting '{name}'")
    });
    let _ = audit::log(&pool, 0, "settings.update", "setting", 0, details).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "name": name })))
}
