use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::errors::AppError;

pub const MIGRATIONS: &str = include_str!("schema.sql");

/// Fixed program-proposal taxonomy, seeded once and never edited through the API.
const CATEGORY_SEED: &[(&str, &str)] = &[
    ("health", "Health and wellness programs"),
    ("education", "Education support and scholarship programs"),
    ("sports", "Sports development and recreation"),
    ("environment", "Environmental protection and cleanup drives"),
    ("livelihood", "Livelihood and employment assistance"),
    ("governance", "Civic engagement and governance participation"),
];

/// Runtime toggles exposed through the settings endpoints.
const SETTINGS_SEED: &[(&str, &str, &str, &str)] = &[
    (
        "auto_approve",
        "false",
        "Auto-approve webhook intake",
        "When enabled, rows ingested from the form webhook are created as approved instead of pending",
    ),
    (
        "send_notifications",
        "true",
        "Send notifications",
        "Notify owners when their submission is reviewed",
    ),
    (
        "send_reminders",
        "false",
        "Send reminders",
        "Remind reviewers about submissions pending for more than a week",
    ),
];

pub async fn init_pool(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(AppError::Db)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::raw_sql(MIGRATIONS).execute(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Seed the proposal category taxonomy and default settings. Idempotent:
/// existing rows are left untouched.
pub async fn seed_lookups(pool: &SqlitePool) -> Result<(), AppError> {
    for (name, description) in CATEGORY_SEED {
        sqlx::query(
            "INSERT INTO proposal_categories (name, description) VALUES ($1, $2)
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .bind(description)
        .execute(pool)
        .await?;
    }

    for (name, value, label, description) in SETTINGS_SEED {
        sqlx::query(
            "INSERT INTO settings (name, value, label, description, setting_type)
             VALUES ($1, $2, $3, $4, 'boolean')
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .bind(value)
        .bind(label)
        .bind(description)
        .execute(pool)
        .await?;
    }

    log::info!("Lookup seed complete");
    Ok(())
}
