//! Webhook intake pipeline for externally-sourced youth-profile rows.
//!
//! Three wire shapes arrive from the form-automation tool (a flat named-column
//! object, a positional array, and a JSON-encoded row batch). One normalizer
//! turns all of them into the canonical [`crate::models::profile::ProfilePayload`];
//! one dispatcher handles duplicate checking and persistence.

pub mod columns;
pub mod ingest;
pub mod normalizer;

pub use ingest::{ingest_rows, IntakeSummary, RowOutcome, RowStatus};
pub use normalizer::{normalize, parse_formatted_rows, repair_upstream_json, RawRow};
