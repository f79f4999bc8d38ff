//! Patient endpoints: list, detail, and the add-patient form.

use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::{Form, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{Followup, Patient};
use crate::service::validate::PatientFormData;

#[derive(Serialize)]
pub struct PatientListResponse {
    pub patients: Vec<Patient>,
    pub total: usize,
}

/// `GET /` — all patients, newest initial diagnosis first.
pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<PatientListResponse>, ApiError> {
    let patients = ctx.service.patient_list()?;
    let total = patients.len();
    Ok(Json(PatientListResponse { patients, total }))
}

#[derive(Serialize)]
pub struct PatientDetailResponse {
    pub patient: Patient,
    pub followups: Vec<Followup>,
}

/// `GET /patient/:id` — one patient with its followups.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<PatientDetailResponse>, ApiError> {
    let (patient, followups) = ctx.service.patient_detail(id)?;
    Ok(Json(PatientDetailResponse { patient, followups }))
}

/// `GET /add_patient` — minimal browser form for manual entry.
pub async fn form() -> Html<&'static str> {
    Html(ADD_PATIENT_FORM)
}

/// `POST /add_patient` — create a patient, redirect to the list.
pub async fn create(
    State(ctx): State<ApiContext>,
    Form(form): Form<PatientFormData>,
) -> Result<Redirect, ApiError> {
    ctx.service.submit_patient(&form)?;
    Ok(Redirect::to("/"))
}

const ADD_PATIENT_FORM: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Add patient</title></head>
<body>
<h1>Add patient</h1>
<form method="post" action="/add_patient">
  <p><label>Name <input name="name" required></label></p>
  <p><label>Gender <input name="gender"></label></p>
  <p><label>Age <input name="age"></label></p>
  <p><label>Contact (phone) <input name="contact"></label></p>
  <p><label>Initial diagnosis date <input name="initial_diagnosis_date" type="date"></label></p>
  <p><label>Nodule size (mm) <input name="nodule_size"></label></p>
  <p><label>Nodule location <input name="nodule_location"></label></p>
  <p><button type="submit">Save</button></p>
</form>
</body>
</html>
"#;
