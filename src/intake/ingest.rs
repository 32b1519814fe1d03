//! Batch ingest dispatcher: duplicate guard, persistence, and the aggregate
//! summary the webhook endpoints return.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::audit;
use crate::errors::AppError;
use crate::models::profile::{self, ProfilePayload};
use crate::models::setting;
use crate::workflow::Status;

/// Webhook rows have no owning user; they belong to the system account.
const SYSTEM_USER_ID: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Created,
    Duplicate,
    Failed,
}

/// Outcome of one row, keyed by the upstream row label (its `row` ordinal
/// when present, otherwise its position in the batch).
#[derive(Debug, Clone, Serialize)]
pub struct RowOutcome {
    pub row: String,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntakeSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub duplicates: usize,
    pub failed: usize,
    pub outcomes: Vec<RowOutcome>,
}

impl IntakeSummary {
    pub fn any_failed(&self) -> bool {
        self.failed > 0
    }
}

/// Ingest a batch of normalized rows sequentially.
///
/// Rows are processed one at a time: the duplicate check followed by the
/// insert must not interleave for rows sharing the same (full_name,
/// birthdate) identity. One row's failure never aborts the rest.
///
/// When the `auto_approve` setting is on, rows are created directly as
/// approved instead of pending.
pub async fn ingest_rows(
    pool: &SqlitePool,
    rows: Vec<(String, Result<ProfilePayload, String>)>,
) -> Result<IntakeSummary, AppError> {
    let auto_approve = setting::get_bool(pool, "auto_approve", false).await;
    let initial_status = if auto_approve {
        Status::Approved
    } else {
        Status::Pending
    };

    let mut summary = IntakeSummary {
        attempted: rows.len(),
        succeeded: 0,
        duplicates: 0,
        failed: 0,
        outcomes: Vec::with_capacity(rows.len()),
    };

    for (label, normalized) in rows {
        let payload = match normalized {
            Ok(p) => p,
            Err(reason) => {
                log::warn!("intake row {label} failed normalization: {reason}");
                summary.failed += 1;
                summary.outcomes.push(RowOutcome {
                    row: label,
                    status: RowStatus::Failed,
                    profile_id: None,
                    reason: Some(reason),
                });
                continue;
            }
        };

        let birthdate = payload.birthdate.as_deref().unwrap_or("");
        match profile::find_by_identity(pool, &payload.full_name, birthdate).await? {
            Some(existing_id) => {
                log::info!(
                    "intake row {label} skipped: duplicate of profile {existing_id} \
                     ({}, {birthdate})",
                    payload.full_name
                );
                summary.duplicates += 1;
                summary.outcomes.push(RowOutcome {
                    row: label,
                    status: RowStatus::Duplicate,
                    profile_id: Some(existing_id),
                    reason: None,
                });
            }
            None => match profile::create(pool, SYSTEM_USER_ID, initial_status, &payload).await {
                Ok(id) => {
                    summary.succeeded += 1;
                    summary.outcomes.push(RowOutcome {
                        row: label,
                        status: RowStatus::Created,
                        profile_id: Some(id),
                        reason: None,
                    });
                }
                Err(e) => {
                    let reason = e.to_string();
                    log::error!(
                        "intake row {label} failed to persist: {reason}; payload: {:?}",
                        payload
                    );
                    summary.failed += 1;
                    summary.outcomes.push(RowOutcome {
                        row: label,
                        status: RowStatus::Failed,
                        profile_id: None,
                        reason: Some(reason),
                    });
                }
            },
        }
    }

    let details = serde_json::json!({
        "attempted": summary.attempted,
        "succeeded": summary.succeeded,
        "duplicates": summary.duplicates,
        "failed": summary.failed,
        "initial_status": initial_status.as_str(),
    });
    let _ = audit::log(pool, SYSTEM_USER_ID, "intake.batch", "youth_profile", 0, details).await;

    Ok(summary)
}
