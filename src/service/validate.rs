//! Explicit per-entity form validation.
//!
//! Each incoming field is typed as required or optional with a
//! parse-or-reject rule. A malformed optional field is dropped from the
//! draft and reported as a rejection; it never fails the whole submission.
//! Only a missing required field (patient name) rejects the request.

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{FollowupDraft, PatientDraft};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw patient form fields as submitted (all text until validated).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientFormData {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub age: Option<String>,
    pub contact: Option<String>,
    pub initial_diagnosis_date: Option<String>,
    pub nodule_size: Option<String>,
    pub nodule_location: Option<String>,
}

/// Raw followup form fields as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FollowupFormData {
    pub followup_date: Option<String>,
    pub checkup_type: Option<String>,
    pub nodule_size: Option<String>,
    pub findings: Option<String>,
}

/// A single optional field whose value failed its parse rule.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldRejection {
    pub field: &'static str,
    pub value: String,
    pub reason: String,
}

/// Failure of a required-field rule; the whole submission is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("patient name is required")]
    MissingName,
}

/// Validate patient form fields into a draft plus any per-field rejections.
pub fn validate_patient(
    form: &PatientFormData,
) -> Result<(PatientDraft, Vec<FieldRejection>), ValidationError> {
    let name = form
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(ValidationError::MissingName)?
        .to_string();

    let mut rejected = Vec::new();
    let draft = PatientDraft {
        name,
        gender: text_field(&form.gender),
        age: parse_field("age", &form.age, parse_integer, &mut rejected),
        contact: text_field(&form.contact),
        initial_diagnosis_date: parse_field(
            "initial_diagnosis_date",
            &form.initial_diagnosis_date,
            parse_date,
            &mut rejected,
        ),
        nodule_size: parse_field("nodule_size", &form.nodule_size, parse_float, &mut rejected),
        nodule_location: text_field(&form.nodule_location),
    };

    Ok((draft, rejected))
}

/// Validate followup form fields. All fields are optional; the date
/// defaults to `today` when omitted.
pub fn validate_followup(
    form: &FollowupFormData,
    today: NaiveDate,
) -> (FollowupDraft, Vec<FieldRejection>) {
    let mut rejected = Vec::new();
    let draft = FollowupDraft {
        followup_date: parse_field("followup_date", &form.followup_date, parse_date, &mut rejected)
            .or(Some(today)),
        checkup_type: text_field(&form.checkup_type),
        nodule_size: parse_field("nodule_size", &form.nodule_size, parse_float, &mut rejected),
        findings: text_field(&form.findings),
    };

    (draft, rejected)
}

/// Optional free-text field: trimmed, empty collapses to absent.
fn text_field(raw: &Option<String>) -> Option<String> {
    raw.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Optional typed field: absent stays absent, malformed is dropped
/// and recorded as a rejection.
fn parse_field<T>(
    field: &'static str,
    raw: &Option<String>,
    parse: fn(&str) -> Result<T, String>,
    rejected: &mut Vec<FieldRejection>,
) -> Option<T> {
    let value = raw.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
    match parse(value) {
        Ok(parsed) => Some(parsed),
        Err(reason) => {
            rejected.push(FieldRejection {
                field,
                value: value.to_string(),
                reason,
            });
            None
        }
    }
}

fn parse_integer(value: &str) -> Result<i64, String> {
    value
        .parse()
        .map_err(|_| format!("not a valid integer: {value}"))
}

fn parse_float(value: &str) -> Result<f64, String> {
    value
        .parse()
        .map_err(|_| format!("not a valid number: {value}"))
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| format!("not a valid YYYY-MM-DD date: {value}"))
}
