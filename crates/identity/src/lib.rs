//! `wardflow-identity` — actor entities and the identity directory.
//!
//! Hospitals (admins), doctors, and patients, their store seams, and the
//! uniqueness checks run before every registration.

pub mod directory;
pub mod doctor;
pub mod hospital;
pub mod patient;
pub mod store;

pub use doctor::{Doctor, DoctorSummary, Unit};
pub use hospital::{Hospital, HospitalSummary};
pub use patient::{BloodGroup, Genotype, Patient, PatientSummary};
pub use store::{DoctorStore, HospitalStore, PatientStore};
