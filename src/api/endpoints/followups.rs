//! Followup endpoints: the add-followup form, scoped to a patient.

use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::Form;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::service::validate::FollowupFormData;

/// `GET /add_followup/:patient_id` — minimal browser form.
/// 404 when the patient does not exist.
pub async fn form(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<i64>,
) -> Result<Html<String>, ApiError> {
    if !ctx.service.patient_exists(patient_id)? {
        return Err(ApiError::NotFound(format!("Patient {patient_id} not found")));
    }
    Ok(Html(add_followup_form(patient_id)))
}

/// `POST /add_followup/:patient_id` — create a followup, redirect to
/// the owning patient's detail.
pub async fn create(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<i64>,
    Form(form): Form<FollowupFormData>,
) -> Result<Redirect, ApiError> {
    ctx.service.submit_followup(patient_id, &form)?;
    Ok(Redirect::to(&format!("/patient/{patient_id}")))
}

fn add_followup_form(patient_id: i64) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Add followup</title></head>
<body>
<h1>Add followup for patient {patient_id}</h1>
<form method="post" action="/add_followup/{patient_id}">
  <p><label>Followup date <input name="followup_date" type="date"></label></p>
  <p><label>Checkup type <input name="checkup_type" placeholder="CT / MRI / X-ray"></label></p>
  <p><label>Nodule size (mm) <input name="nodule_size"></label></p>
  <p><label>Findings <textarea name="findings"></textarea></label></p>
  <p><button type="submit">Add followup</button></p>
</form>
</body>
</html>
"#
    )
}
