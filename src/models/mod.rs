pub mod followup;
pub mod patient;

pub use followup::{Followup, FollowupDraft};
pub use patient::{Patient, PatientDraft};
