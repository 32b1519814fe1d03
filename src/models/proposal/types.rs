use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::workflow::{MAX_IMPLEMENTATION_YEAR, MIN_IMPLEMENTATION_YEAR};

/// Form input for creating or editing a program proposal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProposalPayload {
    pub category_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub expected_outcomes: Vec<String>,
    pub estimated_cost: Option<f64>,
    pub frequency: Option<String>,
    pub funding_source: Option<String>,
    pub people_involved: Option<String>,
    /// ISO dates, `YYYY-MM-DD`.
    pub implementation_start: Option<String>,
    pub implementation_end: Option<String>,
    pub location: Option<String>,
    pub target_participants: Option<i64>,
}

impl ProposalPayload {
    /// Checks required for moving a draft into review: core fields, a real
    /// category, and a sane implementation date range.
    pub fn validate_for_submit(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".into()));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::Validation("description is required".into()));
        }
        if self.category_id <= 0 {
            return Err(AppError::Validation("category is required".into()));
        }

        let start = parse_date("implementation_start", self.implementation_start.as_deref())?;
        let end = parse_date("implementation_end", self.implementation_end.as_deref())?;
        if end <= start {
            return Err(AppError::Validation(
                "implementation_end must be after implementation_start".into(),
            ));
        }
        for (field, date) in [("implementation_start", start), ("implementation_end", end)] {
            let year = date.year();
            if !(MIN_IMPLEMENTATION_YEAR..=MAX_IMPLEMENTATION_YEAR).contains(&year) {
                return Err(AppError::Validation(format!(
                    "{field} year {year} is outside {MIN_IMPLEMENTATION_YEAR}-{MAX_IMPLEMENTATION_YEAR}"
                )));
            }
        }
        Ok(())
    }
}

fn parse_date(field: &str, value: Option<&str>) -> Result<NaiveDate, AppError> {
    let raw = value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("{field} '{raw}' is not a valid date")))
}

/// A stored proposal with its category resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: i64,
    pub category_id: i64,
    pub category_name: String,
    pub submitted_by: i64,
    pub approver_id: Option<i64>,
    pub status: String,

    pub title: String,
    pub description: String,
    pub objectives: Vec<String>,
    pub expected_outcomes: Vec<String>,

    pub estimated_cost: Option<f64>,
    pub frequency: Option<String>,
    pub funding_source: Option<String>,
    pub people_involved: Option<String>,
    pub implementation_start: Option<String>,
    pub implementation_end: Option<String>,
    pub location: Option<String>,
    pub target_participants: Option<i64>,

    pub rejection_reason: Option<String>,
    pub submitted_at: Option<String>,
    pub reviewed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Proposal {
    /// Current fields as an editable payload (used for submit validation).
    pub fn to_payload(&self) -> ProposalPayload {
        ProposalPayload {
            category_id: self.category_id,
            title: self.title.clone(),
            description: self.description.clone(),
            objectives: self.objectives.clone(),
            expected_outcomes: self.expected_outcomes.clone(),
            estimated_cost: self.estimated_cost,
            frequency: self.frequency.clone(),
            funding_source: self.funding_source.clone(),
            people_involved: self.people_involved.clone(),
            implementation_start: self.implementation_start.clone(),
            implementation_end: self.implementation_end.clone(),
            location: self.location.clone(),
            target_participants: self.target_participants,
        }
    }
}

/// A file reference owned by a proposal. Storage of the file itself is
/// outside this service; only the reference is tracked.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attachment {
    pub id: i64,
    pub proposal_id: i64,
    pub file_name: String,
    pub file_path: String,
    pub uploaded_at: String,
}

/// Request body for an attachment reference.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentInput {
    pub file_name: String,
    pub file_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> ProposalPayload {
        ProposalPayload {
            category_id: 1,
            title: "Coastal cleanup".into(),
            description: "Monthly shoreline cleanup drive".into(),
            implementation_start: Some("2025-06-01".into()),
            implementation_end: Some("2025-12-01".into()),
            ..Default::default()
        }
    }

    #[test]
    fn complete_payload_passes() {
        assert!(valid_payload().validate_for_submit().is_ok());
    }

    #[test]
    fn end_must_be_after_start() {
        let mut p = valid_payload();
        p.implementation_end = Some("2025-06-01".into());
        assert!(matches!(
            p.validate_for_submit(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn year_bound_is_enforced() {
        let mut p = valid_payload();
        p.implementation_start = Some("2023-06-01".into());
        assert!(p.validate_for_submit().is_err());
        p.implementation_start = Some("2101-01-01".into());
        p.implementation_end = Some("2101-06-01".into());
        assert!(p.validate_for_submit().is_err());
    }

    #[test]
    fn missing_dates_are_rejected() {
        let mut p = valid_payload();
        p.implementation_end = None;
        assert!(p.validate_for_submit().is_err());
    }
}
