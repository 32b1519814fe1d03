use actix_web::{HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Json(serde_json::Error),
    /// Bad input on a single request (malformed body, missing field).
    Validation(String),
    /// A state transition attempted from a state that does not allow it.
    Workflow(String),
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Json(e) => write!(f, "JSON error: {e}"),
            AppError::Validation(msg) => write!(f, "Validation error: {msg}"),
            AppError::Workflow(msg) => write!(f, "Workflow violation: {msg}"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "not_found"
            })),
            AppError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation",
                "message": msg
            })),
            AppError::Workflow(msg) => HttpResponse::Conflict().json(serde_json::json!({
                "error": "workflow_violation",
                "message": msg
            })),
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "internal"
                }))
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound,
            other => AppError::Db(other),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Json(e)
    }
}
