pub mod downloads;
pub mod followups;
pub mod patients;
