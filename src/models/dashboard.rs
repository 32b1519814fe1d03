use serde::Serialize;
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::{profile, proposal};
use crate::workflow::Status;

/// Count of records per lifecycle status.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusCounts {
    pub draft: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}

/// Profile count per youth classification label.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ClassificationCount {
    pub youth_classification: String,
    pub count: i64,
}

/// Tallies of the voter/participation flags across approved profiles.
#[derive(Debug, Clone, Default, Serialize, sqlx::FromRow)]
pub struct VoterTallies {
    pub sk_voters: i64,
    pub registered_national_voters: i64,
    pub voted_last_election: i64,
    pub attended_assembly: i64,
}

/// Everything the admin dashboard renders.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub profiles: StatusCounts,
    pub proposals: StatusCounts,
    pub profiles_by_classification: Vec<ClassificationCount>,
    pub voter_tallies: VoterTallies,
}

pub async fn load(pool: &SqlitePool) -> Result<DashboardStats, AppError> {
    let mut profiles = StatusCounts::default();
    let mut proposals = StatusCounts::default();
    for status in [Status::Draft, Status::Pending, Status::Approved, Status::Rejected] {
        let p = profile::count_by_status(pool, status).await?;
        let q = proposal::count_by_status(pool, status).await?;
        let (slot_p, slot_q) = match status {
            Status::Draft => (&mut profiles.draft, &mut proposals.draft),
            Status::Pending => (&mut profiles.pending, &mut proposals.pending),
            Status::Approved => (&mut profiles.approved, &mut proposals.approved),
            Status::Rejected => (&mut profiles.rejected, &mut proposals.rejected),
        };
        *slot_p = p;
        *slot_q = q;
    }

    let profiles_by_classification = sqlx::query_as::<_, ClassificationCount>(
        "SELECT COALESCE(youth_classification, 'Unspecified') AS youth_classification,
                COUNT(*) AS count
         FROM youth_profiles WHERE status = 'approved'
         GROUP BY COALESCE(youth_classification, 'Unspecified')
         ORDER BY count DESC",
    )
    .fetch_all(pool)
    .await?;

    let voter_tallies = sqlx::query_as::<_, VoterTallies>(
        "SELECT COALESCE(SUM(is_sk_voter), 0) AS sk_voters,
                COALESCE(SUM(is_registered_national_voter), 0) AS registered_national_voters,
                COALESCE(SUM(voted_last_election), 0) AS voted_last_election,
                COALESCE(SUM(attended_assembly), 0) AS attended_assembly
         FROM youth_profiles WHERE status = 'approved'",
    )
    .fetch_one(pool)
    .await?;

    Ok(DashboardStats {
        profiles,
        proposals,
        profiles_by_classification,
        voter_tallies,
    })
}
