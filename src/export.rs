//! Append-only CSV mirror of the record store.
//!
//! Every created row is appended to a flat export file scoped to its entity
//! type (`patients.csv` / `followups.csv`), with a header row written only
//! when the file is first created. The mirror is best-effort: it fires after
//! the store write commits and is not transactional with it.

use std::fs::OpenOptions;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::{Followup, Patient};

/// Fixed column order of the patients export file.
const PATIENT_COLUMNS: [&str; 8] = [
    "id",
    "name",
    "gender",
    "age",
    "contact",
    "initial_diagnosis_date",
    "nodule_size",
    "nodule_location",
];

/// Fixed column order of the followups export file.
const FOLLOWUP_COLUMNS: [&str; 6] = [
    "id",
    "patient_id",
    "followup_date",
    "checkup_type",
    "nodule_size",
    "findings",
];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No {0} export file has been created yet")]
    NotFound(ExportKind),
}

impl ExportError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExportError::NotFound(_))
    }
}

/// Which entity's export file an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Patients,
    Followups,
}

impl ExportKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportKind::Patients => "patients.csv",
            ExportKind::Followups => "followups.csv",
        }
    }
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportKind::Patients => write!(f, "patients"),
            ExportKind::Followups => write!(f, "followups"),
        }
    }
}

/// Appends created records to flat CSV files under a fixed directory.
/// Files are opened and closed per write.
pub struct MirrorExporter {
    dir: PathBuf,
}

impl MirrorExporter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Append one row for a newly created patient.
    pub fn append_patient_row(&self, patient: &Patient) -> Result<(), ExportError> {
        self.append_row(
            ExportKind::Patients,
            &PATIENT_COLUMNS,
            &[
                patient.id.to_string(),
                patient.name.clone(),
                patient.gender.clone().unwrap_or_default(),
                opt_to_field(patient.age),
                patient.contact.clone().unwrap_or_default(),
                opt_to_field(patient.initial_diagnosis_date),
                opt_to_field(patient.nodule_size),
                patient.nodule_location.clone().unwrap_or_default(),
            ],
        )
    }

    /// Append one row for a newly created followup.
    pub fn append_followup_row(&self, followup: &Followup) -> Result<(), ExportError> {
        self.append_row(
            ExportKind::Followups,
            &FOLLOWUP_COLUMNS,
            &[
                followup.id.to_string(),
                followup.patient_id.to_string(),
                opt_to_field(followup.followup_date),
                followup.checkup_type.clone().unwrap_or_default(),
                opt_to_field(followup.nodule_size),
                followup.findings.clone().unwrap_or_default(),
            ],
        )
    }

    /// Read the raw bytes of an export file.
    /// A file that has never been created is NotFound, not an empty file.
    pub fn read_export(&self, kind: ExportKind) -> Result<Vec<u8>, ExportError> {
        let path = self.dir.join(kind.file_name());
        if !path.is_file() {
            return Err(ExportError::NotFound(kind));
        }
        Ok(std::fs::read(path)?)
    }

    fn append_row(
        &self,
        kind: ExportKind,
        columns: &[&str],
        fields: &[String],
    ) -> Result<(), ExportError> {
        let path = self.dir.join(kind.file_name());
        let is_new = !path.is_file();

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::Writer::from_writer(file);

        if is_new {
            writer.write_record(columns)?;
        }
        writer.write_record(fields)?;
        writer.flush()?;

        tracing::debug!(kind = %kind, "Mirrored row to export file");
        Ok(())
    }
}

fn opt_to_field<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn sample_patient(id: i64) -> Patient {
        Patient {
            id,
            name: "Zhao Lei".to_string(),
            gender: Some("M".to_string()),
            age: Some(64),
            contact: Some("13900139000".to_string()),
            initial_diagnosis_date: NaiveDate::from_ymd_opt(2026, 2, 9),
            nodule_size: Some(8.0),
            nodule_location: Some("left lower lobe".to_string()),
        }
    }

    #[test]
    fn read_before_any_append_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let exporter = MirrorExporter::new(tmp.path().to_path_buf());

        let err = exporter.read_export(ExportKind::Patients).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn first_append_writes_header_then_row() {
        let tmp = tempfile::tempdir().unwrap();
        let exporter = MirrorExporter::new(tmp.path().to_path_buf());

        exporter.append_patient_row(&sample_patient(1)).unwrap();

        let bytes = exporter.read_export(ExportKind::Patients).unwrap();
        let content = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "id,name,gender,age,contact,initial_diagnosis_date,nodule_size,nodule_location"
        );
        assert_eq!(
            lines[1],
            "1,Zhao Lei,M,64,13900139000,2026-02-09,8,left lower lobe"
        );
    }

    #[test]
    fn second_append_does_not_repeat_header() {
        let tmp = tempfile::tempdir().unwrap();
        let exporter = MirrorExporter::new(tmp.path().to_path_buf());

        exporter.append_patient_row(&sample_patient(1)).unwrap();
        exporter.append_patient_row(&sample_patient(2)).unwrap();

        let bytes = exporter.read_export(ExportKind::Patients).unwrap();
        let content = String::from_utf8(bytes).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert_eq!(content.matches("id,name").count(), 1);
    }

    #[test]
    fn absent_optionals_serialize_as_empty_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let exporter = MirrorExporter::new(tmp.path().to_path_buf());

        exporter
            .append_patient_row(&Patient {
                id: 7,
                name: "Sun Li".to_string(),
                gender: None,
                age: None,
                contact: None,
                initial_diagnosis_date: None,
                nodule_size: None,
                nodule_location: None,
            })
            .unwrap();

        let bytes = exporter.read_export(ExportKind::Patients).unwrap();
        let content = String::from_utf8(bytes).unwrap();
        assert_eq!(content.lines().nth(1), Some("7,Sun Li,,,,,,"));
    }

    #[test]
    fn followup_rows_use_fixed_column_order() {
        let tmp = tempfile::tempdir().unwrap();
        let exporter = MirrorExporter::new(tmp.path().to_path_buf());

        exporter
            .append_followup_row(&Followup {
                id: 3,
                patient_id: 1,
                followup_date: NaiveDate::from_ymd_opt(2026, 8, 20),
                checkup_type: Some("CT".to_string()),
                nodule_size: Some(7.5),
                findings: Some("slight decrease".to_string()),
            })
            .unwrap();

        let bytes = exporter.read_export(ExportKind::Followups).unwrap();
        let content = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "id,patient_id,followup_date,checkup_type,nodule_size,findings"
        );
        assert_eq!(lines[1], "3,1,2026-08-20,CT,7.5,slight decrease");
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let tmp = tempfile::tempdir().unwrap();
        let exporter = MirrorExporter::new(tmp.path().to_path_buf());

        exporter
            .append_followup_row(&Followup {
                id: 1,
                patient_id: 1,
                followup_date: None,
                checkup_type: None,
                nodule_size: None,
                findings: Some("stable, recommend recheck in 6 months".to_string()),
            })
            .unwrap();

        let bytes = exporter.read_export(ExportKind::Followups).unwrap();
        let content = String::from_utf8(bytes).unwrap();
        assert!(content.contains("\"stable, recommend recheck in 6 months\""));
    }

    #[test]
    fn patient_and_followup_files_are_separate() {
        let tmp = tempfile::tempdir().unwrap();
        let exporter = MirrorExporter::new(tmp.path().to_path_buf());

        exporter.append_patient_row(&sample_patient(1)).unwrap();

        assert!(exporter.read_export(ExportKind::Patients).is_ok());
        let err = exporter.read_export(ExportKind::Followups).unwrap_err();
        assert!(err.is_not_found());
    }
}
