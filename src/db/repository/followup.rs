use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{Followup, FollowupDraft};

/// Insert a new followup under the given patient and return it with its
/// store-assigned id. The foreign key constraint rejects unknown patients;
/// callers resolve the patient first for a proper NotFound.
pub fn insert_followup(
    conn: &Connection,
    patient_id: i64,
    draft: &FollowupDraft,
) -> Result<Followup, DatabaseError> {
    conn.execute(
        "INSERT INTO followups (patient_id, followup_date, checkup_type, nodule_size, findings)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            patient_id,
            draft.followup_date,
            draft.checkup_type,
            draft.nodule_size,
            draft.findings,
        ],
    )?;

    Ok(Followup {
        id: conn.last_insert_rowid(),
        patient_id,
        followup_date: draft.followup_date,
        checkup_type: draft.checkup_type.clone(),
        nodule_size: draft.nodule_size,
        findings: draft.findings.clone(),
    })
}

/// List all followups recorded for a patient, oldest first.
pub fn list_followups_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<Followup>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, followup_date, checkup_type, nodule_size, findings
         FROM followups WHERE patient_id = ?1
         ORDER BY id",
    )?;

    let rows = stmt.query_map(params![patient_id], |row| {
        Ok(Followup {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            followup_date: row.get(2)?,
            checkup_type: row.get(3)?,
            nodule_size: row.get(4)?,
            findings: row.get(5)?,
        })
    })?;

    let mut followups = Vec::new();
    for row in rows {
        followups.push(row?);
    }
    Ok(followups)
}
