//! JSON API for youth-profile review and lifecycle actions.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::audit;
use crate::errors::AppError;
use crate::models::profile::{self, ProfilePayload, YouthProfile};
use crate::workflow::{self, Status};

#[derive(Debug, Deserialize)]
pub struct CreateProfileForm {
    pub user_id: i64,
    pub profile: ProfilePayload,
}

#[derive(Debug, Deserialize)]
pub struct EditProfileForm {
    pub user_id: i64,
    pub profile: ProfilePayload,
}

#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    pub approver_id: i64,
    pub notes: Option<String>,
}

async fn load(pool: &SqlitePool, id: i64) -> Result<(YouthProfile, Status), AppError> {
    let record = profile::find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;
    let status: Status = record.status.parse()?;
    Ok((record, status))
}

/// POST /api/profiles — user-initiated creation, always a draft.
pub async fn create(
    pool: web::Data<SqlitePool>,
    form: web::Json<CreateProfileForm>,
) -> Result<HttpResponse, AppError> {
    let id = profile::create(&pool, form.user_id, Status::Draft, &form.profile).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "id": id })))
}

/// PUT /api/profiles/{id} — owner edit, draft and rejected only. Editing a
/// rejected profile reopens it as a draft.
pub async fn update(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    form: web::Json<EditProfileForm>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (record, status) = load(&pool, id).await?;
    if record.user_id != form.user_id {
        return Err(AppError::Validation("only the owner may edit this profile".into()));
    }
    workflow::validate_owner_edit("profile", status)?;

    profile::update_fields(&pool, id, &form.profile).await?;
    if status == Status::Rejected {
        profile::mark_reopened(&pool, id).await?;
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": id })))
}

/// PUT /api/profiles/{id}/admin — administrative in-place edit, any status.
/// Not a workflow transition: the status is left untouched.
pub async fn admin_update(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    form: web::Json<EditProfileForm>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let _ = load(&pool, id).await?;
    profile::update_fields(&pool, id, &form.profile).await?;

    let details = serde_json::json!({
        "summary": format!("Admin edited profile #{id} in place")
    });
    let _ = audit::log(&pool, form.user_id, "profile.admin_edited", "youth_profile", id, details).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": id })))
}

/// POST /api/profiles/{id}/submit — draft (or rejected) into review. An
/// incomplete draft cannot transition; the first missing field is named.
pub async fn submit(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (record, status) = load(&pool, id).await?;
    workflow::validate_transition("profile", status, Status::Pending)?;

    if let Some(field) = record.to_payload().missing_required_field() {
        return Err(AppError::Validation(format!("missing required field: {field}")));
    }

    profile::mark_submitted(&pool, id).await?;

    let details = serde_json::json!({
        "summary": format!("Submitted profile #{id} for review")
    });
    let _ = audit::log(&pool, record.user_id, "profile.submitted", "youth_profile", id, details).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": id, "status": "pending" })))
}

/// POST /api/profiles/{id}/approve
pub async fn approve(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    form: web::Json<ReviewForm>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (_, status) = load(&pool, id).await?;
    workflow::validate_transition("profile", status, Status::Approved)?;

    profile::set_review(&pool, id, Status::Approved, form.approver_id, form.notes.as_deref()).await?;

    let details = serde_json::json!({
        "notes": form.notes,
        "summary": format!("Approved profile #{id}")
    });
    let _ = audit::log(&pool, form.approver_id, "profile.approved", "youth_profile", id, details).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": id, "status": "approved" })))
}

/// POST /api/profiles/{id}/reject — the notes double as the rejection reason;
/// profiles have no separate reason field.
pub async fn reject(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    form: web::Json<ReviewForm>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (_, status) = load(&pool, id).await?;
    workflow::validate_transition("profile", status, Status::Rejected)?;

    profile::set_review(&pool, id, Status::Rejected, form.approver_id, form.notes.as_deref()).await?;

    let details = serde_json::json!({
        "notes": form.notes,
        "summary": format!("Rejected profile #{id}")
    });
    let _ = audit::log(&pool, form.approver_id, "profile.rejected", "youth_profile", id, details).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": id, "status": "rejected" })))
}

/// DELETE /api/profiles/{id} — admin hard delete of pending/rejected records.
pub async fn delete(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (_, status) = load(&pool, id).await?;
    workflow::validate_delete("profile", status)?;

    profile::delete(&pool, id).await?;

    let details = serde_json::json!({
        "summary": format!("Deleted profile #{id} (was {status})")
    });
    let _ = audit::log(&pool, 0, "profile.deleted", "youth_profile", id, details).await;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/profiles?status= — review list, optionally scoped to one status.
pub async fn list(
    pool: web::Data<SqlitePool>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let status = match query.get("status") {
        Some(s) => Some(s.parse::<Status>()?),
        None => None,
    };
    let profiles = profile::find_all(&pool, status).await?;
    Ok(HttpResponse::Ok().json(profiles))
}

/// GET /api/profiles/{id}
pub async fn detail(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let (record, _) = load(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}
