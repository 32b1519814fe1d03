use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::workflow::Status;

use super::types::{Attachment, Proposal, ProposalPayload};

#[derive(sqlx::FromRow)]
struct Row {
    id: i64,
    category_id: i64,
    category_name: String,
    submitted_by: i64,
    approver_id: Option<i64>,
    status: String,
    title: String,
    description: String,
    objectives: String,
    expected_outcomes: String,
    estimated_cost: Option<f64>,
    frequency: Option<String>,
    funding_source: Option<String>,
    people_involved: Option<String>,
    implementation_start: Option<String>,
    implementation_end: Option<String>,
    location: Option<String>,
    target_participants: Option<i64>,
    rejection_reason: Option<String>,
    submitted_at: Option<String>,
    reviewed_at: Option<String>,
    created_at: String,
    updated_at: String,
}

const SELECT_SQL: &str = "SELECT p.id, p.category_id, c.name AS category_name, p.submitted_by, \
     p.approver_id, p.status, p.title, p.description, p.objectives, p.expected_outcomes, \
     p.estimated_cost, p.frequency, p.funding_source, p.people_involved, \
     p.implementation_start, p.implementation_end, p.location, p.target_participants, \
     p.rejection_reason, p.submitted_at, p.reviewed_at, p.created_at, p.updated_at \
     FROM proposals p JOIN proposal_categories c ON c.id = p.category_id";

impl Row {
    fn into_proposal(self) -> Proposal {
        // Objectives and outcomes are stored as JSON arrays; anything
        // unreadable degrades to an empty list rather than failing the read.
        let objectives = serde_json::from_str(&self.objectives).unwrap_or_default();
        let expected_outcomes = serde_json::from_str(&self.expected_outcomes).unwrap_or_default();
        Proposal {
            id: self.id,
            category_id: self.category_id,
            category_name: self.category_name,
            submitted_by: self.submitted_by,
            approver_id: self.approver_id,
            status: self.status,
            title: self.title,
            description: self.description,
            objectives,
            expected_outcomes,
            estimated_cost: self.estimated_cost,
            frequency: self.frequency,
            funding_source: self.funding_source,
            people_involved: self.people_involved,
            implementation_start: self.implementation_start,
            implementation_end: self.implementation_end,
            location: self.location,
            target_participants: self.target_participants,
            rejection_reason: self.rejection_reason,
            submitted_at: self.submitted_at,
            reviewed_at: self.reviewed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Create a new draft proposal. Returns the new id.
pub async fn create(
    pool: &SqlitePool,
    submitted_by: i64,
    payload: &ProposalPayload,
) -> Result<i64, AppError> {
    let row: (i64,) = sqlx::query_as(
        "INSERT INTO proposals (
             category_id, submitted_by, status, title, description,
             objectives, expected_outcomes, estimated_cost, frequency,
             funding_source, people_involved, implementation_start,
             implementation_end, location, target_participants
         ) VALUES ($1, $2, 'draft', $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
         RETURNING id",
    )
    .bind(payload.category_id)
    .bind(submitted_by)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(serde_json::to_string(&payload.objectives)?)
    .bind(serde_json::to_string(&payload.expected_outcomes)?)
    .bind(payload.estimated_cost)
    .bind(&payload.frequency)
    .bind(&payload.funding_source)
    .bind(&payload.people_involved)
    .bind(&payload.implementation_start)
    .bind(&payload.implementation_end)
    .bind(&payload.location)
    .bind(payload.target_participants)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Proposal>, AppError> {
    let row = sqlx::query_as::<_, Row>(&format!("{SELECT_SQL} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Row::into_proposal))
}

/// List proposals, newest first, optionally filtered by status and category.
pub async fn find_all(
    pool: &SqlitePool,
    status: Option<Status>,
    category_id: Option<i64>,
) -> Result<Vec<Proposal>, AppError> {
    let mut sql = format!("{SELECT_SQL} WHERE 1 = 1");
    if status.is_some() {
        sql.push_str(" AND p.status = $1");
    }
    if category_id.is_some() {
        sql.push_str(if status.is_some() {
            " AND p.category_id = $2"
        } else {
            " AND p.category_id = $1"
        });
    }
    sql.push_str(" ORDER BY p.submitted_at DESC, p.id DESC");

    let mut query = sqlx::query_as::<_, Row>(&sql);
    if let Some(s) = status {
        query = query.bind(s.as_str().to_string());
    }
    if let Some(cid) = category_id {
        query = query.bind(cid);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows.into_iter().map(Row::into_proposal).collect())
}

/// Overwrite the editable fields of a draft proposal.
pub async fn update_fields(
    pool: &SqlitePool,
    id: i64,
    payload: &ProposalPayload,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE proposals SET
             category_id = $1, title = $2, description = $3, objectives = $4,
             expected_outcomes = $5, estimated_cost = $6, frequency = $7,
             funding_source = $8, people_involved = $9, implementation_start = $10,
             implementation_end = $11, location = $12, target_participants = $13,
             updated_at = $14
         WHERE id = $15",
    )
    .bind(payload.category_id)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(serde_json::to_string(&payload.objectives)?)
    .bind(serde_json::to_string(&payload.expected_outcomes)?)
    .bind(payload.estimated_cost)
    .bind(&payload.frequency)
    .bind(&payload.funding_source)
    .bind(&payload.people_involved)
    .bind(&payload.implementation_start)
    .bind(&payload.implementation_end)
    .bind(&payload.location)
    .bind(payload.target_participants)
    .bind(now())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Move a proposal into pending. Resubmission clears the previous review.
pub async fn mark_submitted(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE proposals
         SET status = 'pending', submitted_at = $1, approver_id = NULL,
             rejection_reason = NULL, reviewed_at = NULL, updated_at = $1
         WHERE id = $2",
    )
    .bind(now())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Record a review decision. A rejection carries its reason; approval clears
/// any stale reason.
pub async fn set_review(
    pool: &SqlitePool,
    id: i64,
    status: Status,
    approver_id: i64,
    rejection_reason: Option<&str>,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE proposals
         SET status = $1, approver_id = $2, rejection_reason = $3,
             reviewed_at = $4, updated_at = $4
         WHERE id = $5",
    )
    .bind(status.as_str())
    .bind(approver_id)
    .bind(rejection_reason)
    .bind(now())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Return a rejected proposal to draft for re-editing, clearing the review.
pub async fn mark_reopened(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE proposals
         SET status = 'draft', approver_id = NULL, rejection_reason = NULL,
             reviewed_at = NULL, updated_at = $1
         WHERE id = $2",
    )
    .bind(now())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn count_by_status(pool: &SqlitePool, status: Status) -> Result<i64, AppError> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM proposals WHERE status = $1")
        .bind(status.as_str())
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

// --- Attachments ---

pub async fn add_attachment(
    pool: &SqlitePool,
    proposal_id: i64,
    file_name: &str,
    file_path: &str,
) -> Result<i64, AppError> {
    let row: (i64,) = sqlx::query_as(
        "INSERT INTO proposal_attachments (proposal_id, file_name, file_path)
         VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(proposal_id)
    .bind(file_name)
    .bind(file_path)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

pub async fn attachments_for(
    pool: &SqlitePool,
    proposal_id: i64,
) -> Result<Vec<Attachment>, AppError> {
    let rows = sqlx::query_as::<_, Attachment>(
        "SELECT id, proposal_id, file_name, file_path, uploaded_at
         FROM proposal_attachments WHERE proposal_id = $1 ORDER BY id",
    )
    .bind(proposal_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}
