//! Record service: validates submissions, persists them, mirrors them.
//!
//! Constructed with an explicit store connection and exporter. The
//! connection is opened at startup and owned for the process lifetime;
//! a mutex serializes operations (one at a time, matching the
//! single-operator model of the tool).

pub mod validate;

use std::sync::Mutex;

use rusqlite::Connection;
use thiserror::Error;

use crate::db::{self, DatabaseError};
use crate::export::{ExportError, ExportKind, MirrorExporter};
use crate::models::{Followup, Patient};
use validate::{
    validate_followup, validate_patient, FieldRejection, FollowupFormData, PatientFormData,
    ValidationError,
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("patient {0} not found")]
    PatientNotFound(i64),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("internal lock error")]
    LockPoisoned,
}

/// Outcome of a successful submission: the persisted entity plus any
/// optional fields that were dropped for failing their parse rule.
#[derive(Debug)]
pub struct Submitted<T> {
    pub record: T,
    pub rejected_fields: Vec<FieldRejection>,
}

pub struct RecordService {
    conn: Mutex<Connection>,
    exporter: MirrorExporter,
}

impl RecordService {
    pub fn new(conn: Connection, exporter: MirrorExporter) -> Self {
        Self {
            conn: Mutex::new(conn),
            exporter,
        }
    }

    /// Validate and create a patient, then mirror the row.
    pub fn submit_patient(
        &self,
        form: &PatientFormData,
    ) -> Result<Submitted<Patient>, ServiceError> {
        let (draft, rejected_fields) = validate_patient(form)?;
        for rejection in &rejected_fields {
            tracing::warn!(
                field = rejection.field,
                value = %rejection.value,
                "Dropped malformed patient field"
            );
        }

        let patient = {
            let conn = self.lock_conn()?;
            db::insert_patient(&conn, &draft)?
        };
        tracing::info!(id = patient.id, "Patient created");

        self.mirror(|exporter| exporter.append_patient_row(&patient));

        Ok(Submitted {
            record: patient,
            rejected_fields,
        })
    }

    /// Validate and create a followup under an existing patient, then
    /// mirror the row. Unknown patient ids fail before any write.
    pub fn submit_followup(
        &self,
        patient_id: i64,
        form: &FollowupFormData,
    ) -> Result<Submitted<Followup>, ServiceError> {
        let (draft, rejected_fields) =
            validate_followup(form, chrono::Local::now().date_naive());
        for rejection in &rejected_fields {
            tracing::warn!(
                field = rejection.field,
                value = %rejection.value,
                "Dropped malformed followup field"
            );
        }

        let followup = {
            let conn = self.lock_conn()?;
            if !db::patient_exists(&conn, patient_id)? {
                return Err(ServiceError::PatientNotFound(patient_id));
            }
            db::insert_followup(&conn, patient_id, &draft)?
        };
        tracing::info!(id = followup.id, patient_id, "Followup created");

        self.mirror(|exporter| exporter.append_followup_row(&followup));

        Ok(Submitted {
            record: followup,
            rejected_fields,
        })
    }

    /// All patients, newest initial diagnosis first.
    pub fn patient_list(&self) -> Result<Vec<Patient>, ServiceError> {
        let conn = self.lock_conn()?;
        Ok(db::list_patients(&conn)?)
    }

    /// One patient with all of its followups.
    pub fn patient_detail(
        &self,
        id: i64,
    ) -> Result<(Patient, Vec<Followup>), ServiceError> {
        let conn = self.lock_conn()?;
        let patient = db::get_patient(&conn, id).map_err(|e| {
            if e.is_not_found() {
                ServiceError::PatientNotFound(id)
            } else {
                ServiceError::Database(e)
            }
        })?;
        let followups = db::list_followups_for_patient(&conn, id)?;
        Ok((patient, followups))
    }

    /// Whether a patient id resolves (used by the followup form page).
    pub fn patient_exists(&self, id: i64) -> Result<bool, ServiceError> {
        let conn = self.lock_conn()?;
        Ok(db::patient_exists(&conn, id)?)
    }

    /// Raw bytes of an export file, NotFound if never created.
    pub fn export_bytes(&self, kind: ExportKind) -> Result<Vec<u8>, ServiceError> {
        Ok(self.exporter.read_export(kind)?)
    }

    /// Best-effort mirror append. The store write has already committed;
    /// a mirror failure leaves the store ahead of the file and is only
    /// logged (no reconciliation).
    fn mirror(&self, append: impl FnOnce(&MirrorExporter) -> Result<(), ExportError>) {
        if let Err(e) = append(&self.exporter) {
            tracing::warn!("Mirror export append failed: {e}");
        }
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, ServiceError> {
        self.conn.lock().map_err(|_| ServiceError::LockPoisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn test_service() -> (RecordService, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let conn = open_memory_database().unwrap();
        let exporter = MirrorExporter::new(tmp.path().to_path_buf());
        (RecordService::new(conn, exporter), tmp)
    }

    fn patient_form(name: &str) -> PatientFormData {
        PatientFormData {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn submit_patient_persists_and_mirrors() {
        let (service, _tmp) = test_service();

        let submitted = service.submit_patient(&patient_form("Gao Yan")).unwrap();
        assert_eq!(submitted.record.name, "Gao Yan");
        assert!(submitted.rejected_fields.is_empty());

        let listed = service.patient_list().unwrap();
        assert_eq!(listed.len(), 1);

        let csv = service.export_bytes(ExportKind::Patients).unwrap();
        let content = String::from_utf8(csv).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.lines().nth(1).unwrap().starts_with(&format!(
            "{},Gao Yan,",
            submitted.record.id
        )));
    }

    #[test]
    fn submit_patient_without_name_writes_nothing() {
        let (service, _tmp) = test_service();

        let result = service.submit_patient(&PatientFormData::default());
        assert!(matches!(result, Err(ServiceError::Validation(_))));

        assert!(service.patient_list().unwrap().is_empty());
        assert!(service
            .export_bytes(ExportKind::Patients)
            .unwrap_err()
            .to_string()
            .contains("export file"));
    }

    #[test]
    fn submit_patient_ids_are_monotonic() {
        let (service, _tmp) = test_service();
        let first = service.submit_patient(&patient_form("A")).unwrap();
        let second = service.submit_patient(&patient_form("B")).unwrap();
        assert!(second.record.id > first.record.id);
    }

    #[test]
    fn submit_followup_links_and_appears_in_detail() {
        let (service, _tmp) = test_service();
        let patient = service.submit_patient(&patient_form("Ma Hui")).unwrap().record;

        let followup = service
            .submit_followup(
                patient.id,
                &FollowupFormData {
                    checkup_type: Some("CT".to_string()),
                    nodule_size: Some("5.5".to_string()),
                    ..Default::default()
                },
            )
            .unwrap()
            .record;

        assert_eq!(followup.patient_id, patient.id);
        // Date defaulted to creation day
        assert!(followup.followup_date.is_some());

        let (_, followups) = service.patient_detail(patient.id).unwrap();
        assert_eq!(followups.len(), 1);
        assert_eq!(followups[0].id, followup.id);
    }

    #[test]
    fn submit_followup_unknown_patient_writes_nothing() {
        let (service, _tmp) = test_service();
        let patient = service.submit_patient(&patient_form("An Na")).unwrap().record;

        let result = service.submit_followup(999, &FollowupFormData::default());
        assert!(matches!(result, Err(ServiceError::PatientNotFound(999))));

        // No store row for the unknown id, nor under the real patient
        {
            let conn = service.lock_conn().unwrap();
            assert!(db::list_followups_for_patient(&conn, 999)
                .unwrap()
                .is_empty());
        }
        let (_, followups) = service.patient_detail(patient.id).unwrap();
        assert!(followups.is_empty());

        // No export file row either
        let err = service.export_bytes(ExportKind::Followups).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Export(ExportError::NotFound(_))
        ));
    }

    #[test]
    fn malformed_optional_fields_reported_but_not_fatal() {
        let (service, _tmp) = test_service();

        let submitted = service
            .submit_patient(&PatientFormData {
                name: Some("Qian Bo".to_string()),
                age: Some("old".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert!(submitted.record.age.is_none());
        assert_eq!(submitted.rejected_fields.len(), 1);
        assert_eq!(submitted.rejected_fields[0].field, "age");
    }

    #[test]
    fn patient_detail_unknown_id_is_not_found() {
        let (service, _tmp) = test_service();
        let result = service.patient_detail(5);
        assert!(matches!(result, Err(ServiceError::PatientNotFound(5))));
    }

    #[test]
    fn mirror_failure_does_not_fail_submission() {
        // Point the exporter at a directory that does not exist; the
        // append fails but the store write still succeeds.
        let conn = open_memory_database().unwrap();
        let exporter = MirrorExporter::new(std::path::PathBuf::from(
            "/nonexistent/export/dir",
        ));
        let service = RecordService::new(conn, exporter);

        let submitted = service.submit_patient(&patient_form("Deng Fei")).unwrap();
        assert!(submitted.record.id > 0);
        assert_eq!(service.patient_list().unwrap().len(), 1);
    }
}
