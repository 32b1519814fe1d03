use serde::{Deserialize, Serialize};

/// Canonical youth-profile field set, shared by API creation/edit bodies and
/// the webhook intake normalizer. Optional strings are None rather than empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePayload {
    pub full_name: String,
    pub address: Option<String>,
    pub gender: Option<String>,
    /// ISO date, `YYYY-MM-DD`.
    pub birthdate: Option<String>,
    /// Parsed from the submitted age field, never derived from the birthdate.
    /// The two can disagree; that mirrors what the forms actually collect.
    pub age: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub civil_status: Option<String>,
    pub youth_age_group: Option<String>,

    pub mother_name: Option<String>,
    pub father_name: Option<String>,
    pub parents_monthly_income: Option<f64>,

    pub education_level: Option<String>,
    pub youth_classification: Option<String>,
    pub work_status: Option<String>,
    #[serde(default)]
    pub is_sk_voter: bool,
    #[serde(default)]
    pub is_registered_national_voter: bool,
    #[serde(default)]
    pub voted_last_election: bool,
    #[serde(default)]
    pub attended_assembly: bool,
    pub assembly_attendance_count: Option<i64>,
    pub assembly_absence_reason: Option<String>,
    pub personal_monthly_income: Option<f64>,
    pub interests: Option<String>,
    pub suggested_program: Option<String>,
}

impl ProfilePayload {
    /// First required field that is missing, or None if the payload is
    /// complete enough to submit for review. The four engagement flags are
    /// always present (they default to false), so only the string fields
    /// are checked.
    pub fn missing_required_field(&self) -> Option<&'static str> {
        fn blank(v: &Option<String>) -> bool {
            v.as_deref().map_or(true, |s| s.trim().is_empty())
        }
        if self.full_name.trim().is_empty() {
            return Some("full_name");
        }
        if blank(&self.address) {
            return Some("address");
        }
        if blank(&self.gender) {
            return Some("gender");
        }
        if blank(&self.birthdate) {
            return Some("birthdate");
        }
        if blank(&self.civil_status) {
            return Some("civil_status");
        }
        if blank(&self.youth_age_group) {
            return Some("youth_age_group");
        }
        if blank(&self.education_level) {
            return Some("education_level");
        }
        if blank(&self.youth_classification) {
            return Some("youth_classification");
        }
        if blank(&self.work_status) {
            return Some("work_status");
        }
        None
    }
}

/// A stored youth profile, review metadata included.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct YouthProfile {
    pub id: i64,
    pub user_id: i64,
    pub status: String,
    pub approver_id: Option<i64>,
    pub review_notes: Option<String>,
    pub submitted_at: Option<String>,
    pub reviewed_at: Option<String>,

    pub full_name: String,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub birthdate: Option<String>,
    pub age: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub civil_status: Option<String>,
    pub youth_age_group: Option<String>,

    pub mother_name: Option<String>,
    pub father_name: Option<String>,
    pub parents_monthly_income: Option<f64>,

    pub education_level: Option<String>,
    pub youth_classification: Option<String>,
    pub work_status: Option<String>,
    pub is_sk_voter: bool,
    pub is_registered_national_voter: bool,
    pub voted_last_election: bool,
    pub attended_assembly: bool,
    pub assembly_attendance_count: Option<i64>,
    pub assembly_absence_reason: Option<String>,
    pub personal_monthly_income: Option<f64>,
    pub interests: Option<String>,
    pub suggested_program: Option<String>,

    pub created_at: String,
    pub updated_at: String,
}

impl YouthProfile {
    /// Current fields as an editable payload (used for submit validation).
    pub fn to_payload(&self) -> ProfilePayload {
        ProfilePayload {
            full_name: self.full_name.clone(),
            address: self.address.clone(),
            gender: self.gender.clone(),
            birthdate: self.birthdate.clone(),
            age: self.age,
            email: self.email.clone(),
            phone: self.phone.clone(),
            civil_status: self.civil_status.clone(),
            youth_age_group: self.youth_age_group.clone(),
            mother_name: self.mother_name.clone(),
            father_name: self.father_name.clone(),
            parents_monthly_income: self.parents_monthly_income,
            education_level: self.education_level.clone(),
            youth_classification: self.youth_classification.clone(),
            work_status: self.work_status.clone(),
            is_sk_voter: self.is_sk_voter,
            is_registered_national_voter: self.is_registered_national_voter,
            voted_last_election: self.voted_last_election,
            attended_assembly: self.attended_assembly,
            assembly_attendance_count: self.assembly_attendance_count,
            assembly_absence_reason: self.assembly_absence_reason.clone(),
            personal_monthly_income: self.personal_monthly_income,
            interests: self.interests.clone(),
            suggested_program: self.suggested_program.clone(),
        }
    }
}
