//! Row-level operations on the record store.
//!
//! Both entities are append-only: the only write operations are inserts.
//! Followups are reached through an explicit per-patient query rather than
//! relationship traversal.

mod followup;
mod patient;

pub use followup::{insert_followup, list_followups_for_patient};
pub use patient::{get_patient, insert_patient, list_patients, patient_exists};
