//! Store seams for the identity entities.
//!
//! One capability per entity; implementations live in the infra crate
//! (in-memory for tests/dev, Postgres for production). Each `create` must
//! enforce the entity's unique fields as the authoritative backstop for the
//! directory's pre-checks: a duplicate slipping past the pre-check race
//! surfaces as a `Conflict`, never a crash.

use std::sync::Arc;

use async_trait::async_trait;

use wardflow_core::{DoctorId, DomainResult, HospitalId};

use crate::{Doctor, Hospital, Patient};

#[async_trait]
pub trait HospitalStore: Send + Sync {
    async fn create(&self, hospital: Hospital) -> DomainResult<Hospital>;
    async fn find_by_id(&self, id: HospitalId) -> DomainResult<Option<Hospital>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Hospital>>;
    async fn exists_by_email(&self, email: &str) -> DomainResult<bool>;
    async fn exists_by_phone(&self, phone: &str) -> DomainResult<bool>;
    async fn exists_by_username(&self, username: &str) -> DomainResult<bool>;
}

#[async_trait]
pub trait DoctorStore: Send + Sync {
    async fn create(&self, doctor: Doctor) -> DomainResult<Doctor>;

    /// Replace the stored record wholesale (used by the rotation flow so the
    /// hash and flag flips land together).
    async fn update(&self, doctor: Doctor) -> DomainResult<Doctor>;

    async fn find_by_id(&self, id: DoctorId) -> DomainResult<Option<Doctor>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Doctor>>;
    async fn exists_by_email(&self, email: &str) -> DomainResult<bool>;
    async fn exists_by_phone(&self, phone: &str) -> DomainResult<bool>;
}

#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn create(&self, patient: Patient) -> DomainResult<Patient>;

    /// Replace the stored record wholesale (token issue/consume and password
    /// updates always travel with their flag changes).
    async fn update(&self, patient: Patient) -> DomainResult<Patient>;

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Patient>>;
    async fn exists_by_email(&self, email: &str) -> DomainResult<bool>;
    async fn exists_by_phone(&self, phone: &str) -> DomainResult<bool>;
}

#[async_trait]
impl<S> HospitalStore for Arc<S>
where
    S: HospitalStore + ?Sized,
{
    async fn create(&self, hospital: Hospital) -> DomainResult<Hospital> {
        (**self).create(hospital).await
    }

    async fn find_by_id(&self, id: HospitalId) -> DomainResult<Option<Hospital>> {
        (**self).find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Hospital>> {
        (**self).find_by_email(email).await
    }

    async fn exists_by_email(&self, email: &str) -> DomainResult<bool> {
        (**self).exists_by_email(email).await
    }

    async fn exists_by_phone(&self, phone: &str) -> DomainResult<bool> {
        (**self).exists_by_phone(phone).await
    }

    async fn exists_by_username(&self, username: &str) -> DomainResult<bool> {
        (**self).exists_by_username(username).await
    }
}

#[async_trait]
impl<S> DoctorStore for Arc<S>
where
    S: DoctorStore + ?Sized,
{
    async fn create(&self, doctor: Doctor) -> DomainResult<Doctor> {
        (**self).create(doctor).await
    }

    async fn update(&self, doctor: Doctor) -> DomainResult<Doctor> {
        (**self).update(doctor).await
    }

    async fn find_by_id(&self, id: DoctorId) -> DomainResult<Option<Doctor>> {
        (**self).find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Doctor>> {
        (**self).find_by_email(email).await
    }

    async fn exists_by_email(&self, email: &str) -> DomainResult<bool> {
        (**self).exists_by_email(email).await
    }

    async fn exists_by_phone(&self, phone: &str) -> DomainResult<bool> {
        (**self).exists_by_phone(phone).await
    }
}

#[async_trait]
impl<S> PatientStore for Arc<S>
where
    S: PatientStore + ?Sized,
{
    async fn create(&self, patient: Patient) -> DomainResult<Patient> {
        (**self).create(patient).await
    }

    async fn update(&self, patient: Patient) -> DomainResult<Patient> {
        (**self).update(patient).await
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Patient>> {
        (**self).find_by_email(email).await
    }

    async fn exists_by_email(&self, email: &str) -> DomainResult<bool> {
        (**self).exists_by_email(email).await
    }

    async fn exists_by_phone(&self, phone: &str) -> DomainResult<bool> {
        (**self).exists_by_phone(phone).await
    }
}
