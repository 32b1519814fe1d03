//! Dispatcher-level tests for the webhook intake pipeline: per-row outcomes,
//! duplicate skipping, the auto-approve toggle, and persistence round-trips.

mod common;

use serde_json::json;

use sk_records::intake::{ingest_rows, normalize, RawRow, RowStatus};
use sk_records::models::{profile, setting};
use sk_records::workflow::Status;

fn normalized(row: &serde_json::Value) -> Result<sk_records::models::profile::ProfilePayload, String> {
    normalize(&RawRow::from_named(row.as_object().unwrap()))
}

#[actix_rt::test]
async fn batch_with_one_bad_birthdate_reports_that_row() {
    let pool = common::setup_pool().await;

    let mut bad = common::named_row("Pedro Santos", "2/17/2001");
    bad["COL$G"] = json!("17 Feb 2001");

    let rows = vec![
        ("1".to_string(), normalized(&common::named_row("Juan Dela Cruz", "2/17/2001"))),
        ("2".to_string(), normalized(&bad)),
        ("3".to_string(), normalized(&common::named_row("Ana Reyes", "7/4/2002"))),
    ];
    let summary = ingest_rows(&pool, rows).await.unwrap();

    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.duplicates, 0);

    let failed: Vec<_> = summary
        .outcomes
        .iter()
        .filter(|o| o.status == RowStatus::Failed)
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].row, "2");
    assert!(failed[0].reason.as_ref().unwrap().contains("birthdate"));
}

#[actix_rt::test]
async fn matching_identity_is_skipped_as_duplicate_not_error() {
    let pool = common::setup_pool().await;

    let first = vec![("1".to_string(), normalized(&common::named_row("Juan Dela Cruz", "2/17/2001")))];
    let summary = ingest_rows(&pool, first).await.unwrap();
    assert_eq!(summary.succeeded, 1);
    let existing_id = summary.outcomes[0].profile_id.unwrap();

    let again = vec![("1".to_string(), normalized(&common::named_row("Juan Dela Cruz", "2/17/2001")))];
    let summary = ingest_rows(&pool, again).await.unwrap();

    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.duplicates, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.outcomes[0].status, RowStatus::Duplicate);
    assert_eq!(summary.outcomes[0].profile_id, Some(existing_id));

    // Still only one stored profile for that identity.
    let all = profile::find_all(&pool, None).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[actix_rt::test]
async fn ingested_rows_default_to_pending() {
    let pool = common::setup_pool().await;

    let rows = vec![("1".to_string(), normalized(&common::named_row("Juan Dela Cruz", "2/17/2001")))];
    let summary = ingest_rows(&pool, rows).await.unwrap();
    let id = summary.outcomes[0].profile_id.unwrap();

    let stored = profile::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.status, "pending");
    assert!(stored.submitted_at.is_some());
}

#[actix_rt::test]
async fn auto_approve_creates_rows_as_approved() {
    let pool = common::setup_pool().await;
    setting::update_value(&pool, "auto_approve", "true").await.unwrap();

    let rows = vec![("1".to_string(), normalized(&common::named_row("Ana Reyes", "7/4/2002")))];
    let summary = ingest_rows(&pool, rows).await.unwrap();
    let id = summary.outcomes[0].profile_id.unwrap();

    let stored = profile::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.status, "approved");
}

#[actix_rt::test]
async fn persisted_profile_round_trips_the_canonical_payload() {
    let pool = common::setup_pool().await;

    let payload = normalized(&common::named_row("Juan Dela Cruz", "2/17/2001")).unwrap();
    let rows = vec![("1".to_string(), Ok(payload.clone()))];
    let summary = ingest_rows(&pool, rows).await.unwrap();
    let id = summary.outcomes[0].profile_id.unwrap();

    let stored = profile::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.to_payload(), payload);
    assert_eq!(stored.birthdate.as_deref(), Some("2001-02-17"));
    assert_eq!(stored.parents_monthly_income, Some(8000.00));
    assert_eq!(stored.personal_monthly_income, Some(1500.00));
}

#[actix_rt::test]
async fn duplicate_guard_matches_any_status() {
    let pool = common::setup_pool().await;

    // Seed an approved profile, then ingest the same identity.
    let payload = normalized(&common::named_row("Juan Dela Cruz", "2/17/2001")).unwrap();
    profile::create(&pool, 0, Status::Approved, &payload).await.unwrap();

    let rows = vec![("1".to_string(), Ok(payload))];
    let summary = ingest_rows(&pool, rows).await.unwrap();
    assert_eq!(summary.duplicates, 1);
    assert_eq!(summary.succeeded, 0);
}
