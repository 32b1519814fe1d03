//! Static column table for the upstream spreadsheet.
//!
//! The form-automation tool exports one row per submission with columns B
//! through Z. Named-column payloads key these as `COL$B`..`COL$Z`; positional
//! payloads use the matching 0-based index (A = 0 is the sheet's row id and
//! is unused).

pub const AGREEMENT: usize = 1; // B: consent text, not stored
pub const FULL_NAME: usize = 2; // C
pub const ADDRESS: usize = 3; // D
pub const GENDER: usize = 4; // E
pub const AGE: usize = 5; // F
pub const BIRTHDATE: usize = 6; // G, "M/D/YYYY"
pub const EMAIL: usize = 7; // H
pub const PHONE: usize = 8; // I
pub const CIVIL_STATUS: usize = 9; // J
pub const YOUTH_AGE_GROUP: usize = 10; // K
pub const EDUCATION_LEVEL: usize = 11; // L
pub const YOUTH_CLASSIFICATION: usize = 12; // M
pub const WORK_STATUS: usize = 13; // N
pub const SK_VOTER: usize = 14; // O, Yes/No
pub const NATIONAL_VOTER: usize = 15; // P, Yes/No
pub const VOTED_LAST_ELECTION: usize = 16; // Q, Yes/No
pub const ATTENDED_ASSEMBLY: usize = 17; // R, Yes/No
pub const ASSEMBLY_COUNT: usize = 18; // S
pub const ABSENCE_REASON: usize = 19; // T
pub const MOTHER_NAME: usize = 20; // U
pub const FATHER_NAME: usize = 21; // V
pub const PARENTS_INCOME: usize = 22; // W
pub const PERSONAL_INCOME: usize = 23; // X
pub const SUGGESTED_PROGRAM: usize = 24; // Y
pub const INTERESTS: usize = 25; // Z

/// Highest column index in use (Z).
pub const LAST_COLUMN: usize = INTERESTS;

/// The `COL$x` key used by named-column payloads for a given index.
pub fn key_for(index: usize) -> String {
    debug_assert!((1..=LAST_COLUMN).contains(&index));
    format!("COL${}", (b'A' + index as u8) as char)
}
