//! Central status state machine for youth profiles and program proposals.
//!
//! Every endpoint that moves a record between statuses goes through the
//! transition checks here instead of comparing status strings inline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;

/// Implementation dates on a proposal must fall within these years.
/// Policy bound, not a hard law.
pub const MIN_IMPLEMENTATION_YEAR: i32 = 2024;
pub const MAX_IMPLEMENTATION_YEAR: i32 = 2100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Pending => "pending",
            Status::Approved => "approved",
            Status::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Status::Draft),
            "pending" => Ok(Status::Pending),
            "approved" => Ok(Status::Approved),
            "rejected" => Ok(Status::Rejected),
            other => Err(AppError::Validation(format!("unknown status '{other}'"))),
        }
    }
}

/// Shared transition table for profiles and proposals.
///
/// Approved is terminal: admins may edit an approved record in place, but
/// that is an override, not a transition, and never passes through here.
fn allowed(from: Status, to: Status) -> bool {
    use Status::*;
    matches!(
        (from, to),
        (Draft, Pending)
            | (Pending, Approved)
            | (Pending, Rejected)
            | (Rejected, Draft)
            | (Rejected, Pending)
    )
}

/// Validate a status transition, returning a workflow violation if the
/// current state does not support it.
pub fn validate_transition(kind: &str, from: Status, to: Status) -> Result<(), AppError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(AppError::Workflow(format!(
            "cannot move {kind} from '{from}' to '{to}'"
        )))
    }
}

/// Hard delete is limited to records that never cleared review.
pub fn validate_delete(kind: &str, status: Status) -> Result<(), AppError> {
    match status {
        Status::Rejected | Status::Pending => Ok(()),
        other => Err(AppError::Workflow(format!(
            "cannot delete a {kind} in status '{other}'"
        ))),
    }
}

/// Owner edits are limited to draft and rejected records. Admin in-place
/// edits bypass this check.
pub fn validate_owner_edit(kind: &str, status: Status) -> Result<(), AppError> {
    match status {
        Status::Draft | Status::Rejected => Ok(()),
        other => Err(AppError::Workflow(format!(
            "cannot edit a {kind} in status '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_approve_reject_paths_are_allowed() {
        assert!(validate_transition("profile", Status::Draft, Status::Pending).is_ok());
        assert!(validate_transition("profile", Status::Pending, Status::Approved).is_ok());
        assert!(validate_transition("profile", Status::Pending, Status::Rejected).is_ok());
        assert!(validate_transition("profile", Status::Rejected, Status::Draft).is_ok());
        assert!(validate_transition("profile", Status::Rejected, Status::Pending).is_ok());
    }

    #[test]
    fn approving_a_draft_is_a_workflow_violation() {
        let err = validate_transition("profile", Status::Draft, Status::Approved).unwrap_err();
        assert!(matches!(err, AppError::Workflow(_)));
    }

    #[test]
    fn approved_is_terminal() {
        for to in [Status::Draft, Status::Pending, Status::Rejected] {
            assert!(validate_transition("proposal", Status::Approved, to).is_err());
        }
    }

    #[test]
    fn delete_only_from_pending_or_rejected() {
        assert!(validate_delete("profile", Status::Pending).is_ok());
        assert!(validate_delete("profile", Status::Rejected).is_ok());
        assert!(validate_delete("profile", Status::Draft).is_err());
        assert!(validate_delete("profile", Status::Approved).is_err());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for s in [Status::Draft, Status::Pending, Status::Approved, Status::Rejected] {
            assert_eq!(s.as_str().parse::<Status>().unwrap(), s);
        }
        assert!("submitted".parse::<Status>().is_err());
    }
}
