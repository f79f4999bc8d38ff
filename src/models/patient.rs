use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A monitored patient. Created once, never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub gender: Option<String>,
    pub age: Option<i64>,
    pub contact: Option<String>,
    pub initial_diagnosis_date: Option<NaiveDate>,
    /// Nodule size in millimeters at initial diagnosis.
    pub nodule_size: Option<f64>,
    pub nodule_location: Option<String>,
}

/// Validated field set for a patient about to be created.
/// The store assigns the id on insert.
#[derive(Debug, Clone, Default)]
pub struct PatientDraft {
    pub name: String,
    pub gender: Option<String>,
    pub age: Option<i64>,
    pub contact: Option<String>,
    pub initial_diagnosis_date: Option<NaiveDate>,
    pub nodule_size: Option<f64>,
    pub nodule_location: Option<String>,
}
