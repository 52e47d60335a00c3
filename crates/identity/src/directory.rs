//! Identity directory — uniqueness checks run before every registration.
//!
//! These read-through checks exist so the error can name the conflicting
//! field. They race with concurrent registrations; the store's unique
//! constraints are the authoritative backstop.

use wardflow_core::{DomainError, DomainResult};

use crate::store::{DoctorStore, HospitalStore, PatientStore};

/// Reject a hospital registration whose email, phone, or username is taken.
///
/// The username check queries the username field (the system this replaces
/// checked the phone field here).
pub async fn ensure_hospital_unique<S>(
    store: &S,
    email: &str,
    phone: &str,
    username: &str,
) -> DomainResult<()>
where
    S: HospitalStore + ?Sized,
{
    if store.exists_by_email(email).await? {
        return Err(DomainError::conflict(format!(
            "hospital with email: {email} already exists"
        )));
    }
    if store.exists_by_phone(phone).await? {
        return Err(DomainError::conflict(format!(
            "hospital with phone: {phone} already exists"
        )));
    }
    if store.exists_by_username(username).await? {
        return Err(DomainError::conflict(format!(
            "hospital with username: {username} already exists"
        )));
    }
    Ok(())
}

/// Reject a doctor registration whose email or phone is taken.
pub async fn ensure_doctor_unique<S>(store: &S, email: &str, phone: &str) -> DomainResult<()>
where
    S: DoctorStore + ?Sized,
{
    if store.exists_by_email(email).await? {
        return Err(DomainError::conflict(format!(
            "doctor with email: {email} already exists"
        )));
    }
    if store.exists_by_phone(phone).await? {
        return Err(DomainError::conflict(format!(
            "doctor with phone: {phone} already exists"
        )));
    }
    Ok(())
}

/// Reject a patient registration whose email or phone is taken.
pub async fn ensure_patient_unique<S>(store: &S, email: &str, phone: &str) -> DomainResult<()>
where
    S: PatientStore + ?Sized,
{
    if store.exists_by_email(email).await? {
        return Err(DomainError::conflict(format!(
            "patient with email: {email} already exists"
        )));
    }
    if store.exists_by_phone(phone).await? {
        return Err(DomainError::conflict(format!(
            "patient with phone: {phone} already exists"
        )));
    }
    Ok(())
}
