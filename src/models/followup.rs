use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A follow-up checkup belonging to exactly one patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Followup {
    pub id: i64,
    pub patient_id: i64,
    pub followup_date: Option<NaiveDate>,
    /// Imaging modality or other checkup type (CT, MRI, X-ray, ...).
    pub checkup_type: Option<String>,
    /// Nodule size in millimeters at this checkup.
    pub nodule_size: Option<f64>,
    pub findings: Option<String>,
}

/// Validated field set for a followup about to be created.
/// The owning patient id is supplied separately by the caller.
#[derive(Debug, Clone, Default)]
pub struct FollowupDraft {
    pub followup_date: Option<NaiveDate>,
    pub checkup_type: Option<String>,
    pub nodule_size: Option<f64>,
    pub findings: Option<String>,
}
