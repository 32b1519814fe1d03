//! Shared test infrastructure: in-memory database setup and payload builders.
#![allow(dead_code)] // not every test binary uses every builder

use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use sk_records::db;

/// In-memory SQLite pool with the schema applied and lookups seeded.
/// A single connection keeps every query on the same in-memory database.
pub async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory test DB");
    db::run_migrations(&pool).await.expect("Failed to run migrations");
    db::seed_lookups(&pool).await.expect("Failed to seed lookups");
    pool
}

/// A complete named-column webhook row for the given identity.
pub fn named_row(full_name: &str, birthdate: &str) -> Value {
    json!({
        "COL$B": "I agree to the data privacy terms",
        "COL$C": full_name,
        "COL$D": "Purok 3, Barangay San Isidro",
        "COL$E": "male",
        "COL$F": "19",
        "COL$G": birthdate,
        "COL$H": "youth@example.com",
        "COL$I": "09171234567",
        "COL$J": "Single",
        "COL$K": "Core Youth",
        "COL$L": "College Level",
        "COL$M": "In School Youth",
        "COL$N": "Student",
        "COL$O": "Yes",
        "COL$P": "No",
        "COL$Q": "Yes",
        "COL$R": "Yes",
        "COL$S": "2",
        "COL$T": "",
        "COL$U": "Maria Dela Cruz",
        "COL$V": "Jose Dela Cruz",
        "COL$W": "8,000.00",
        "COL$X": "1,500",
        "COL$Y": "Sports clinic",
        "COL$Z": "Basketball"
    })
}

/// The same row as a positional array (index 0 is the sheet row id).
pub fn positional_row(full_name: &str, birthdate: &str) -> Value {
    let obj = named_row(full_name, birthdate);
    let obj = obj.as_object().unwrap();
    let mut values = vec![json!("1")];
    for letter in b'B'..=b'Z' {
        let key = format!("COL${}", letter as char);
        values.push(obj.get(&key).cloned().unwrap_or(Value::Null));
    }
    Value::Array(values)
}

/// A profile payload for the JSON API; `complete` controls whether
/// `work_status` is present (the submit-validation test drops it).
pub fn profile_body(full_name: &str, complete: bool) -> Value {
    let mut profile = json!({
        "full_name": full_name,
        "address": "Purok 3, Barangay San Isidro",
        "gender": "Female",
        "birthdate": "2003-05-10",
        "age": 22,
        "civil_status": "Single",
        "youth_age_group": "Core Youth",
        "education_level": "College Level",
        "youth_classification": "In School Youth",
        "is_sk_voter": true,
        "is_registered_national_voter": false,
        "voted_last_election": false,
        "attended_assembly": true
    });
    if complete {
        profile["work_status"] = json!("Student");
    }
    profile
}

/// A proposal payload; `with_dates` controls the implementation date range.
pub fn proposal_body(title: &str, with_dates: bool) -> Value {
    let mut proposal = json!({
        "category_id": 1,
        "title": title,
        "description": "A community program for the barangay youth",
        "objectives": ["Engage out-of-school youth", "Promote healthy habits"],
        "expected_outcomes": ["Higher assembly attendance"],
        "estimated_cost": 15000.0,
        "frequency": "Monthly",
        "funding_source": "SK fund",
        "people_involved": "SK council, volunteers",
        "location": "Barangay covered court",
        "target_participants": 50
    });
    if with_dates {
        proposal["implementation_start"] = json!("2025-06-01");
        proposal["implementation_end"] = json!("2025-12-01");
    }
    proposal
}
