//! Pure row normalization: one external row in, one canonical profile payload
//! (or a descriptive error) out. No persistence, no duplicate checks.

use chrono::NaiveDate;
use serde_json::Value;

use crate::models::profile::ProfilePayload;

use super::columns;

/// A single external row with its cells laid out by column index, regardless
/// of which wire shape it arrived in.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    cells: Vec<Option<String>>,
}

impl RawRow {
    /// Build from a flat `COL$B..COL$Z` object. Extra keys are ignored.
    pub fn from_named(obj: &serde_json::Map<String, Value>) -> Self {
        let mut cells = vec![None; columns::LAST_COLUMN + 1];
        for (index, cell) in cells.iter_mut().enumerate().skip(1) {
            *cell = obj.get(&columns::key_for(index)).and_then(value_to_string);
        }
        RawRow { cells }
    }

    /// Build from a positional array; index 0 is the sheet row id and unused.
    pub fn from_positional(values: &[Value]) -> Self {
        let mut cells = vec![None; columns::LAST_COLUMN + 1];
        for (index, cell) in cells.iter_mut().enumerate().skip(1) {
            *cell = values.get(index).and_then(value_to_string);
        }
        RawRow { cells }
    }

    fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }
}

/// Spreadsheet cells occasionally come through as JSON numbers instead of
/// strings; both are accepted.
fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// The upstream automation tool serializes the row batch with single quotes,
/// which is not valid JSON. Repairing it is deliberately kept as this one
/// isolated step so it can be dropped once the producer is fixed.
pub fn repair_upstream_json(raw: &str) -> String {
    raw.replace('\'', "\"")
}

/// Parse a `formatted_rows` batch: repaired JSON holding an array of
/// named-column objects, each carrying a `row` ordinal for error reporting.
/// Returns (row label, raw row) pairs; rows missing an ordinal are labeled
/// by position.
pub fn parse_formatted_rows(raw: &str) -> Result<Vec<(String, RawRow)>, String> {
    let repaired = repair_upstream_json(raw);
    let parsed: Value = serde_json::from_str(&repaired)
        .map_err(|e| format!("formatted_rows is not valid JSON: {e}"))?;
    let array = parsed
        .as_array()
        .ok_or_else(|| "formatted_rows must be a JSON array".to_string())?;

    let mut rows = Vec::with_capacity(array.len());
    for (position, item) in array.iter().enumerate() {
        let obj = item
            .as_object()
            .ok_or_else(|| format!("formatted_rows[{position}] is not an object"))?;
        let label = obj
            .get("row")
            .and_then(|v| v.as_i64())
            .map(|n| n.to_string())
            .unwrap_or_else(|| (position + 1).to_string());
        rows.push((label, RawRow::from_named(obj)));
    }
    Ok(rows)
}

/// Normalize one raw row into the canonical profile payload.
///
/// One policy per field, applied identically to every wire shape: trimmed
/// case-insensitive "yes" flags, incomes rounded to two decimal places,
/// gender capitalized, and a strict `M/D/YYYY` birthdate that fails the row
/// when unparseable.
pub fn normalize(row: &RawRow) -> Result<ProfilePayload, String> {
    let full_name = clean(row.get(columns::FULL_NAME))
        .ok_or_else(|| "full name is required".to_string())?;
    let birthdate = parse_birthdate(row.get(columns::BIRTHDATE))?;

    Ok(ProfilePayload {
        full_name,
        address: clean(row.get(columns::ADDRESS)),
        gender: clean(row.get(columns::GENDER)).map(|g| capitalize(&g)),
        birthdate: Some(birthdate),
        age: parse_int("age", row.get(columns::AGE))?,
        email: clean(row.get(columns::EMAIL)),
        phone: clean(row.get(columns::PHONE)),
        civil_status: clean(row.get(columns::CIVIL_STATUS)),
        youth_age_group: clean(row.get(columns::YOUTH_AGE_GROUP)),
        mother_name: clean(row.get(columns::MOTHER_NAME)),
        father_name: clean(row.get(columns::FATHER_NAME)),
        parents_monthly_income: parse_income("parents' income", row.get(columns::PARENTS_INCOME))?,
        education_level: clean(row.get(columns::EDUCATION_LEVEL)),
        youth_classification: clean(row.get(columns::YOUTH_CLASSIFICATION)),
        work_status: clean(row.get(columns::WORK_STATUS)),
        is_sk_voter: parse_flag(row.get(columns::SK_VOTER)),
        is_registered_national_voter: parse_flag(row.get(columns::NATIONAL_VOTER)),
        voted_last_election: parse_flag(row.get(columns::VOTED_LAST_ELECTION)),
        attended_assembly: parse_flag(row.get(columns::ATTENDED_ASSEMBLY)),
        assembly_attendance_count: parse_int(
            "assembly attendance count",
            row.get(columns::ASSEMBLY_COUNT),
        )?,
        assembly_absence_reason: clean(row.get(columns::ABSENCE_REASON)),
        personal_monthly_income: parse_income(
            "personal income",
            row.get(columns::PERSONAL_INCOME),
        )?,
        interests: clean(row.get(columns::INTERESTS)),
        suggested_program: clean(row.get(columns::SUGGESTED_PROGRAM)),
    })
}

/// Trim; empty and whitespace-only become None, never empty string.
fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// "Yes"/"yes"/" YES " are true; anything else (including empty) is false.
fn parse_flag(value: Option<&str>) -> bool {
    value.map_or(false, |v| v.trim().eq_ignore_ascii_case("yes"))
}

/// Incomes arrive as strings like "8,000.00". Thousands separators and
/// whitespace are stripped; the result is rounded to two decimal places.
fn parse_income(field: &str, value: Option<&str>) -> Result<Option<f64>, String> {
    let raw = match clean(value) {
        Some(s) => s,
        None => return Ok(None),
    };
    let stripped: String = raw.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    let amount: f64 = stripped
        .parse()
        .map_err(|_| format!("{field} '{raw}' is not a valid amount"))?;
    Ok(Some((amount * 100.0).round() / 100.0))
}

fn parse_int(field: &str, value: Option<&str>) -> Result<Option<i64>, String> {
    let raw = match clean(value) {
        Some(s) => s,
        None => return Ok(None),
    };
    raw.parse::<i64>()
        .map(Some)
        .map_err(|_| format!("{field} '{raw}' is not a whole number"))
}

/// Strict `M/D/YYYY` (non-padded accepted) re-emitted as `YYYY-MM-DD`.
/// A missing or unparseable birthdate fails the row.
fn parse_birthdate(value: Option<&str>) -> Result<String, String> {
    let raw = clean(value).ok_or_else(|| "birthdate is required".to_string())?;
    let date = NaiveDate::parse_from_str(&raw, "%m/%d/%Y")
        .map_err(|_| format!("birthdate '{raw}' is not in M/D/YYYY format"))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

/// "male" -> "Male". Uppercase first letter, lowercase the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn named_row() -> serde_json::Map<String, Value> {
        json!({
            "COL$B": "I agree",
            "COL$C": " Juan Dela Cruz ",
            "COL$D": "Purok 3, Barangay San Isidro",
            "COL$E": "male",
            "COL$F": "19",
            "COL$G": "2/17/2001",
            "COL$H": "juan@example.com",
            "COL$I": "09171234567",
            "COL$J": "Single",
            "COL$K": "Core Youth",
            "COL$L": "College Level",
            "COL$M": "In School Youth",
            "COL$N": "Student",
            "COL$O": "Yes",
            "COL$P": " YES ",
            "COL$Q": "no",
            "COL$R": "maybe",
            "COL$S": "3",
            "COL$T": "",
            "COL$U": "Maria Dela Cruz",
            "COL$V": "Jose Dela Cruz",
            "COL$W": "8,000.00",
            "COL$X": "",
            "COL$Y": "Sports clinic",
            "COL$Z": "Basketball, chess"
        })
        .as_object()
        .unwrap()
        .clone()
    }

    fn positional_row() -> Vec<Value> {
        let obj = named_row();
        let mut values = vec![json!("1")];
        for index in 1..=columns::LAST_COLUMN {
            values.push(obj.get(&columns::key_for(index)).cloned().unwrap_or(Value::Null));
        }
        values
    }

    #[test]
    fn named_row_normalizes() {
        let payload = normalize(&RawRow::from_named(&named_row())).unwrap();
        assert_eq!(payload.full_name, "Juan Dela Cruz");
        assert_eq!(payload.gender.as_deref(), Some("Male"));
        assert_eq!(payload.birthdate.as_deref(), Some("2001-02-17"));
        assert_eq!(payload.age, Some(19));
        assert_eq!(payload.parents_monthly_income, Some(8000.00));
        assert_eq!(payload.personal_monthly_income, None);
        assert!(payload.is_sk_voter);
        assert!(payload.is_registered_national_voter);
        assert!(!payload.voted_last_election);
        assert!(!payload.attended_assembly);
        assert_eq!(payload.assembly_attendance_count, Some(3));
        assert_eq!(payload.assembly_absence_reason, None);
    }

    #[test]
    fn all_shapes_produce_identical_output() {
        let from_named = normalize(&RawRow::from_named(&named_row())).unwrap();
        let from_positional = normalize(&RawRow::from_positional(&positional_row())).unwrap();

        let mut batch_obj = named_row();
        batch_obj.insert("row".into(), json!(1));
        let batch_json = serde_json::to_string(&vec![Value::Object(batch_obj)]).unwrap();
        let rows = parse_formatted_rows(&batch_json).unwrap();
        let from_batch = normalize(&rows[0].1).unwrap();

        assert_eq!(from_named, from_positional);
        assert_eq!(from_named, from_batch);
    }

    #[test]
    fn flags_accept_any_casing_of_yes() {
        for yes in ["yes", "Yes", " YES "] {
            assert!(parse_flag(Some(yes)), "{yes:?} should be true");
        }
        for no in ["no", "", "maybe"] {
            assert!(!parse_flag(Some(no)), "{no:?} should be false");
        }
        assert!(!parse_flag(None));
    }

    #[test]
    fn income_strips_separators_and_rounds() {
        assert_eq!(parse_income("income", Some("8,000.00")).unwrap(), Some(8000.00));
        assert_eq!(parse_income("income", Some(" 1,234.567 ")).unwrap(), Some(1234.57));
        assert_eq!(parse_income("income", Some("")).unwrap(), None);
        assert!(parse_income("income", Some("eight thousand")).is_err());
    }

    #[test]
    fn birthdate_is_strict_on_every_path() {
        assert_eq!(parse_birthdate(Some("2/17/2001")).unwrap(), "2001-02-17");
        assert_eq!(parse_birthdate(Some("12/3/1999")).unwrap(), "1999-12-03");
        assert!(parse_birthdate(Some("2001-02-17")).is_err());
        assert!(parse_birthdate(Some("13/40/2001")).is_err());
        assert!(parse_birthdate(None).is_err());

        let mut obj = named_row();
        obj.insert("COL$G".into(), json!("not a date"));
        assert!(normalize(&RawRow::from_named(&obj)).is_err());
    }

    #[test]
    fn empty_optional_strings_become_null() {
        let mut obj = named_row();
        obj.insert("COL$H".into(), json!("   "));
        obj.insert("COL$I".into(), json!(""));
        let payload = normalize(&RawRow::from_named(&obj)).unwrap();
        assert_eq!(payload.email, None);
        assert_eq!(payload.phone, None);
    }

    #[test]
    fn single_quoted_batches_are_repaired() {
        let raw = "[{'COL$C': 'Ana Reyes', 'COL$G': '7/4/2002', 'row': 5}]";
        let rows = parse_formatted_rows(raw).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, "5");
        let payload = normalize(&rows[0].1).unwrap();
        assert_eq!(payload.full_name, "Ana Reyes");
        assert_eq!(payload.birthdate.as_deref(), Some("2002-07-04"));
    }

    #[test]
    fn rows_without_an_ordinal_are_labeled_by_position() {
        let raw = r#"[{"COL$C": "A", "COL$G": "1/1/2000"}, {"COL$C": "B", "COL$G": "1/2/2000"}]"#;
        let rows = parse_formatted_rows(raw).unwrap();
        assert_eq!(rows[0].0, "1");
        assert_eq!(rows[1].0, "2");
    }

    #[test]
    fn age_is_taken_from_the_raw_field_not_the_birthdate() {
        let mut obj = named_row();
        obj.insert("COL$F".into(), json!("25")); // disagrees with the 2001 birthdate
        let payload = normalize(&RawRow::from_named(&obj)).unwrap();
        assert_eq!(payload.age, Some(25));
        assert_eq!(payload.birthdate.as_deref(), Some("2001-02-17"));
    }
}
