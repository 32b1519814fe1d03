//! JSON API for program proposals and their review workflow.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::audit;
use crate::errors::AppError;
use crate::models::proposal::{self, AttachmentInput, Proposal, ProposalPayload};
use crate::models::category;
use crate::workflow::{self, Status};

#[derive(Debug, Deserialize)]
pub struct CreateProposalForm {
    pub submitted_by: i64,
    pub proposal: ProposalPayload,
    #[serde(default)]
    pub attachments: Vec<AttachmentInput>,
}

#[derive(Debug, Deserialize)]
pub struct EditProposalForm {
    pub submitted_by: i64,
    pub proposal: ProposalPayload,
}

#[derive(Debug, Deserialize, Default)]
pub struct SubmitProposalForm {
    /// Attachments may still be added at submission time.
    #[serde(default)]
    pub attachments: Vec<AttachmentInput>,
}

#[derive(Debug, Deserialize)]
pub struct ApproveForm {
    pub approver_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct RejectForm {
    pub approver_id: i64,
    #[serde(default)]
    pub rejection_reason: String,
}

async fn load(pool: &SqlitePool, id: i64) -> Result<(Proposal, Status), AppError> {
    let record = proposal::find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;
    let status: Status = record.status.parse()?;
    Ok((record, status))
}

async fn require_category(pool: &SqlitePool, category_id: i64) -> Result<(), AppError> {
    if !category::exists(pool, category_id).await? {
        return Err(AppError::Validation(format!("unknown category {category_id}")));
    }
    Ok(())
}

/// POST /api/proposals — new draft, attachment references optional.
pub async fn create(
    pool: web::Data<SqlitePool>,
    form: web::Json<CreateProposalForm>,
) -> Result<HttpResponse, AppError> {
    require_category(&pool, form.proposal.category_id).await?;

    let id = proposal::create(&pool, form.submitted_by, &form.proposal).await?;
    for attachment in &form.attachments {
        proposal::add_attachment(&pool, id, &attachment.file_name, &attachment.file_path).await?;
    }
    Ok(HttpResponse::Created().json(serde_json::json!({ "id": id })))
}

/// PUT /api/proposals/{id} — submitter edit, draft and rejected only.
/// Editing a rejected proposal reopens it as a draft.
pub async fn update(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    form: web::Json<EditProposalForm>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (record, status) = load(&pool, id).await?;
    if record.submitted_by != form.submitted_by {
        return Err(AppError::Validation("only the submitter may edit this proposal".into()));
    }
    workflow::validate_owner_edit("proposal", status)?;
    require_category(&pool, form.proposal.category_id).await?;

    proposal::update_fields(&pool, id, &form.proposal).await?;
    if status == Status::Rejected {
        proposal::mark_reopened(&pool, id).await?;
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": id })))
}

/// POST /api/proposals/{id}/submit — draft (or reopened rejected) into
/// review. Requires the core fields, a real category, and a valid
/// implementation date range.
pub async fn submit(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    form: Option<web::Json<SubmitProposalForm>>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (record, status) = load(&pool, id).await?;
    workflow::validate_transition("proposal", status, Status::Pending)?;

    record.to_payload().validate_for_submit()?;
    require_category(&pool, record.category_id).await?;

    if let Some(form) = &form {
        for attachment in &form.attachments {
            proposal::add_attachment(&pool, id, &attachment.file_name, &attachment.file_path)
                .await?;
        }
    }
    proposal::mark_submitted(&pool, id).await?;

    let details = serde_json::json!({
        "summary": format!("Submitted proposal #{id} for review")
    });
    let _ = audit::log(&pool, record.submitted_by, "proposal.submitted", "proposal", id, details).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": id, "status": "pending" })))
}

/// POST /api/proposals/{id}/approve
pub async fn approve(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    form: web::Json<ApproveForm>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (_, status) = load(&pool, id).await?;
    workflow::validate_transition("proposal", status, Status::Approved)?;

    proposal::set_review(&pool, id, Status::Approved, form.approver_id, None).await?;

    let details = serde_json::json!({
        "summary": format!("Approved proposal #{id}")
    });
    let _ = audit::log(&pool, form.approver_id, "proposal.approved", "proposal", id, details).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": id, "status": "approved" })))
}

/// POST /api/proposals/{id}/reject — a reason is required, distinct from any
/// internal notes.
pub async fn reject(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    form: web::Json<RejectForm>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let reason = form.rejection_reason.trim();
    if reason.is_empty() {
        return Err(AppError::Validation("rejection_reason is required".into()));
    }

    let (_, status) = load(&pool, id).await?;
    workflow::validate_transition("proposal", status, Status::Rejected)?;

    proposal::set_review(&pool, id, Status::Rejected, form.approver_id, Some(reason)).await?;

    let details = serde_json::json!({
        "rejection_reason": reason,
        "summary": format!("Rejected proposal #{id}")
    });
    let _ = audit::log(&pool, form.approver_id, "proposal.rejected", "proposal", id, details).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": id, "status": "rejected" })))
}

/// POST /api/proposals/{id}/attachments — draft only; attachments freeze once
/// the proposal leaves draft.
pub async fn add_attachment(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    form: web::Json<AttachmentInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (_, status) = load(&pool, id).await?;
    if status != Status::Draft {
        return Err(AppError::Workflow(format!(
            "cannot add attachments to a proposal in status '{status}'"
        )));
    }

    let attachment_id =
        proposal::add_attachment(&pool, id, &form.file_name, &form.file_path).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "id": attachment_id })))
}

/// GET /api/proposals?status=&category_id=
pub async fn list(
    pool: web::Data<SqlitePool>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let status = match query.get("status") {
        Some(s) => Some(s.parse::<Status>()?),
        None => None,
    };
    let category_id = query.get("category_id").and_then(|s| s.parse::<i64>().ok());
    let proposals = proposal::find_all(&pool, status, category_id).await?;
    Ok(HttpResponse::Ok().json(proposals))
}

/// GET /api/proposals/{id} — detail including attachment references.
pub async fn detail(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (record, _) = load(&pool, id).await?;
    let attachments = proposal::attachments_for(&pool, id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "proposal": record,
        "attachments": attachments,
    })))
}

/// GET /api/categories — fixed taxonomy for proposal forms.
pub async fn categories(pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let categories = category::find_all(&pool).await?;
    Ok(HttpResponse::Ok().json(categories))
}
