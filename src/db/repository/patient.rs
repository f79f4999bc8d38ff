use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::{Patient, PatientDraft};

/// Insert a new patient and return it with its store-assigned id.
pub fn insert_patient(
    conn: &Connection,
    draft: &PatientDraft,
) -> Result<Patient, DatabaseError> {
    conn.execute(
        "INSERT INTO patients (name, gender, age, contact, initial_diagnosis_date, nodule_size, nodule_location)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            draft.name,
            draft.gender,
            draft.age,
            draft.contact,
            draft.initial_diagnosis_date,
            draft.nodule_size,
            draft.nodule_location,
        ],
    )?;

    Ok(Patient {
        id: conn.last_insert_rowid(),
        name: draft.name.clone(),
        gender: draft.gender.clone(),
        age: draft.age,
        contact: draft.contact.clone(),
        initial_diagnosis_date: draft.initial_diagnosis_date,
        nodule_size: draft.nodule_size,
        nodule_location: draft.nodule_location.clone(),
    })
}

/// Fetch a single patient by id.
pub fn get_patient(conn: &Connection, id: i64) -> Result<Patient, DatabaseError> {
    conn.query_row(
        "SELECT id, name, gender, age, contact, initial_diagnosis_date, nodule_size, nodule_location
         FROM patients WHERE id = ?1",
        params![id],
        patient_from_row,
    )
    .optional()?
    .ok_or_else(|| DatabaseError::NotFound {
        entity_type: "patient".to_string(),
        id,
    })
}

/// Check whether a patient id exists (cheaper than a full fetch).
pub fn patient_exists(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM patients WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// List all patients, newest initial diagnosis first.
/// Patients with no diagnosis date sort last; ties break on newest id.
pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, gender, age, contact, initial_diagnosis_date, nodule_size, nodule_location
         FROM patients
         ORDER BY initial_diagnosis_date IS NULL, initial_diagnosis_date DESC, id DESC",
    )?;

    let rows = stmt.query_map([], patient_from_row)?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(row?);
    }
    Ok(patients)
}

fn patient_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        gender: row.get(2)?,
        age: row.get(3)?,
        contact: row.get(4)?,
        initial_diagnosis_date: row.get(5)?,
        nodule_size: row.get(6)?,
        nodule_location: row.get(7)?,
    })
}
