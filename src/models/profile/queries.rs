use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::workflow::Status;

use super::types::{ProfilePayload, YouthProfile};

const SELECT_COLUMNS: &str = "id, user_id, status, approver_id, review_notes, submitted_at, \
     reviewed_at, full_name, address, gender, birthdate, age, email, phone, civil_status, \
     youth_age_group, mother_name, father_name, parents_monthly_income, education_level, \
     youth_classification, work_status, is_sk_voter, is_registered_national_voter, \
     voted_last_election, attended_assembly, assembly_attendance_count, \
     assembly_absence_reason, personal_monthly_income, interests, suggested_program, \
     created_at, updated_at";

/// Insert a new profile with the given initial status. Returns the new id.
pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    status: Status,
    payload: &ProfilePayload,
) -> Result<i64, AppError> {
    let submitted_at = match status {
        Status::Draft => None,
        _ => Some(now()),
    };
    let row: (i64,) = sqlx::query_as(
        "INSERT INTO youth_profiles (
             user_id, status, submitted_at,
             full_name, address, gender, birthdate, age, email, phone,
             civil_status, youth_age_group, mother_name, father_name,
             parents_monthly_income, education_level, youth_classification,
             work_status, is_sk_voter, is_registered_national_voter,
             voted_last_election, attended_assembly, assembly_attendance_count,
             assembly_absence_reason, personal_monthly_income, interests,
             suggested_program
         ) VALUES (
             $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
             $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27
         ) RETURNING id",
    )
    .bind(user_id)
    .bind(status.as_str())
    .bind(submitted_at)
    .bind(&payload.full_name)
    .bind(&payload.address)
    .bind(&payload.gender)
    .bind(&payload.birthdate)
    .bind(payload.age)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(&payload.civil_status)
    .bind(&payload.youth_age_group)
    .bind(&payload.mother_name)
    .bind(&payload.father_name)
    .bind(payload.parents_monthly_income)
    .bind(&payload.education_level)
    .bind(&payload.youth_classification)
    .bind(&payload.work_status)
    .bind(payload.is_sk_voter)
    .bind(payload.is_registered_national_voter)
    .bind(payload.voted_last_election)
    .bind(payload.attended_assembly)
    .bind(payload.assembly_attendance_count)
    .bind(&payload.assembly_absence_reason)
    .bind(payload.personal_monthly_income)
    .bind(&payload.interests)
    .bind(&payload.suggested_program)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<YouthProfile>, AppError> {
    let profile = sqlx::query_as::<_, YouthProfile>(&format!(
        "SELECT {SELECT_COLUMNS} FROM youth_profiles WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(profile)
}

/// Duplicate guard lookup: exact match on (full_name, birthdate), any status.
/// The normalizer's trimming is relied on for consistent comparison keys.
pub async fn find_by_identity(
    pool: &SqlitePool,
    full_name: &str,
    birthdate: &str,
) -> Result<Option<i64>, AppError> {
    let row: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM youth_profiles WHERE full_name = $1 AND birthdate = $2 LIMIT 1",
    )
    .bind(full_name)
    .bind(birthdate)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| r.0))
}

/// List profiles, newest submission first, optionally scoped to one status.
pub async fn find_all(
    pool: &SqlitePool,
    status: Option<Status>,
) -> Result<Vec<YouthProfile>, AppError> {
    let profiles = match status {
        Some(s) => {
            sqlx::query_as::<_, YouthProfile>(&format!(
                "SELECT {SELECT_COLUMNS} FROM youth_profiles WHERE status = $1
                 ORDER BY submitted_at DESC, id DESC"
            ))
            .bind(s.as_str())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, YouthProfile>(&format!(
                "SELECT {SELECT_COLUMNS} FROM youth_profiles
                 ORDER BY submitted_at DESC, id DESC"
            ))
            .fetch_all(pool)
            .await?
        }
    };
    Ok(profiles)
}

/// Overwrite the editable fields of a profile. Status and review metadata
/// are untouched; callers enforce who may edit in which state.
pub async fn update_fields(
    pool: &SqlitePool,
    id: i64,
    payload: &ProfilePayload,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE youth_profiles SET
             full_name = $1, address = $2, gender = $3, birthdate = $4, age = $5,
             email = $6, phone = $7, civil_status = $8, youth_age_group = $9,
             mother_name = $10, father_name = $11, parents_monthly_income = $12,
             education_level = $13, youth_classification = $14, work_status = $15,
             is_sk_voter = $16, is_registered_national_voter = $17,
             voted_last_election = $18, attended_assembly = $19,
             assembly_attendance_count = $20, assembly_absence_reason = $21,
             personal_monthly_income = $22, interests = $23, suggested_program = $24,
             updated_at = $25
         WHERE id = $26",
    )
    .bind(&payload.full_name)
    .bind(&payload.address)
    .bind(&payload.gender)
    .bind(&payload.birthdate)
    .bind(payload.age)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(&payload.civil_status)
    .bind(&payload.youth_age_group)
    .bind(&payload.mother_name)
    .bind(&payload.father_name)
    .bind(payload.parents_monthly_income)
    .bind(&payload.education_level)
    .bind(&payload.youth_classification)
    .bind(&payload.work_status)
    .bind(payload.is_sk_voter)
    .bind(payload.is_registered_national_voter)
    .bind(payload.voted_last_election)
    .bind(payload.attended_assembly)
    .bind(payload.assembly_attendance_count)
    .bind(&payload.assembly_absence_reason)
    .bind(payload.personal_monthly_income)
    .bind(&payload.interests)
    .bind(&payload.suggested_program)
    .bind(now())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Move a profile into pending. On resubmission of a rejected profile the
/// previous review attribution is cleared.
pub async fn mark_submitted(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE youth_profiles
         SET status = 'pending', submitted_at = $1, approver_id = NULL,
             review_notes = NULL, reviewed_at = NULL, updated_at = $1
         WHERE id = $2",
    )
    .bind(now())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Record a review decision (approved or rejected) with approver attribution.
/// For profiles the notes double as the rejection reason.
pub async fn set_review(
    pool: &SqlitePool,
    id: i64,
    status: Status,
    approver_id: i64,
    notes: Option<&str>,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE youth_profiles
         SET status = $1, approver_id = $2, review_notes = $3,
             reviewed_at = $4, updated_at = $4
         WHERE id = $5",
    )
    .bind(status.as_str())
    .bind(approver_id)
    .bind(notes)
    .bind(now())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Return a rejected profile to draft for re-editing, clearing the review
/// attribution.
pub async fn mark_reopened(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE youth_profiles
         SET status = 'draft', approver_id = NULL, review_notes = NULL,
             reviewed_at = NULL, updated_at = $1
         WHERE id = $2",
    )
    .bind(now())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    sqlx::query("DELETE FROM youth_profiles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn count_by_status(pool: &SqlitePool, status: Status) -> Result<i64, AppError> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM youth_profiles WHERE status = $1")
        .bind(status.as_str())
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}
