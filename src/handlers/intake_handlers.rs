//! Webhook endpoints for the external form-automation intake.
//!
//! All three endpoints read the raw body themselves rather than relying on an
//! extractor: a malformed payload must be echoed back and logged with its
//! original bytes so a failed import can be replayed and debugged.

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::intake::{ingest_rows, normalize, parse_formatted_rows, IntakeSummary, RawRow};

fn summary_response(summary: IntakeSummary) -> HttpResponse {
    let status = if summary.any_failed() {
        StatusCode::MULTI_STATUS
    } else {
        StatusCode::OK
    };
    HttpResponse::build(status).json(summary)
}

fn malformed_body(raw: &str, message: String) -> HttpResponse {
    log::warn!("intake rejected malformed payload: {message}; raw: {raw}");
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": "malformed_payload",
        "message": message,
        "raw": raw,
    }))
}

/// POST /webhook/intake/named-columns
///
/// Body: a flat object of `COL$B..COL$Z` plus arbitrary extra keys (ignored).
/// Returns the single row's outcome; a malformed body gets a structured 400
/// with the offending payload echoed back.
pub async fn named_columns(
    pool: web::Data<SqlitePool>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let raw = String::from_utf8_lossy(&body).to_string();

    let parsed: Value = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => return Ok(malformed_body(&raw, format!("body is not valid JSON: {e}"))),
    };
    let obj = match parsed.as_object() {
        Some(o) => o,
        None => return Ok(malformed_body(&raw, "body must be a JSON object".into())),
    };

    let row = RawRow::from_named(obj);
    let payload = normalize(&row).map_err(|reason| {
        log::warn!("intake row failed normalization: {reason}; raw: {raw}");
        AppError::Validation(reason)
    })?;

    let mut summary = ingest_rows(&pool, vec![("1".to_string(), Ok(payload))]).await?;
    let outcome = summary.outcomes.remove(0);
    if summary.failed > 0 {
        return Ok(HttpResponse::InternalServerError().json(outcome));
    }
    Ok(HttpResponse::Ok().json(outcome))
}

/// POST /webhook/intake/indexed-rows
///
/// Body: `{"raw_rows": "<JSON array of positional-array rows>"}`. Returns the
/// aggregate summary plus one outcome per row; 207 if any row failed.
pub async fn indexed_rows(
    pool: web::Data<SqlitePool>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let raw = String::from_utf8_lossy(&body).to_string();

    let parsed: Value = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => return Ok(malformed_body(&raw, format!("body is not valid JSON: {e}"))),
    };
    let encoded = parsed
        .get("raw_rows")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::Validation("missing required key 'raw_rows'".into()))?;

    let rows_value: Value = match serde_json::from_str(encoded) {
        Ok(v) => v,
        Err(e) => return Ok(malformed_body(encoded, format!("raw_rows is not valid JSON: {e}"))),
    };
    let array = match rows_value.as_array() {
        Some(a) => a,
        None => return Ok(malformed_body(encoded, "raw_rows must be a JSON array".into())),
    };

    let rows = array
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let label = (position + 1).to_string();
            let normalized = match item.as_array() {
                Some(cells) => normalize(&RawRow::from_positional(cells)),
                None => Err(format!("row {label} is not an array")),
            };
            (label, normalized)
        })
        .collect();

    let summary = ingest_rows(&pool, rows).await?;
    Ok(summary_response(summary))
}

/// POST /webhook/intake/batch
///
/// Body: `{"formatted_rows": "<single-quoted JSON array of named-column
/// objects with a 'row' ordinal>"}`. Same response contract as indexed-rows.
pub async fn batch(
    pool: web::Data<SqlitePool>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let raw = String::from_utf8_lossy(&body).to_string();

    let parsed: Value = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => return Ok(malformed_body(&raw, format!("body is not valid JSON: {e}"))),
    };
    let encoded = parsed
        .get("formatted_rows")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::Validation("missing required key 'formatted_rows'".into()))?;

    let batch_rows = match parse_formatted_rows(encoded) {
        Ok(rows) => rows,
        Err(reason) => return Ok(malformed_body(encoded, reason)),
    };

    let rows = batch_rows
        .into_iter()
        .map(|(label, row)| {
            let normalized = normalize(&row);
            (label, normalized)
        })
        .collect();

    let summary = ingest_rows(&pool, rows).await?;
    Ok(summary_response(summary))
}
