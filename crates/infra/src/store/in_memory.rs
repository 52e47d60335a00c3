//! In-memory stores.
//!
//! Intended for tests/dev. Each `create` re-checks its unique fields under
//! the write lock, which makes the store the backstop for the directory's
//! (racy) pre-checks — mirroring what the unique indexes do in Postgres.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use wardflow_core::{DoctorId, DomainError, DomainResult, HospitalId, PatientId, ReservationId};
use wardflow_identity::{Doctor, DoctorStore, Hospital, HospitalStore, Patient, PatientStore};
use wardflow_scheduling::{Reservation, ReservationStore};

fn poisoned() -> DomainError {
    DomainError::internal("store lock poisoned")
}

#[derive(Debug, Default)]
pub struct InMemoryHospitalStore {
    inner: RwLock<HashMap<HospitalId, Hospital>>,
}

impl InMemoryHospitalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HospitalStore for InMemoryHospitalStore {
    async fn create(&self, hospital: Hospital) -> DomainResult<Hospital> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if map.values().any(|h| {
            h.email == hospital.email
                || h.phone == hospital.phone
                || h.username == hospital.username
        }) {
            return Err(DomainError::conflict("hospital already exists"));
        }
        map.insert(hospital.id, hospital.clone());
        Ok(hospital)
    }

    async fn find_by_id(&self, id: HospitalId) -> DomainResult<Option<Hospital>> {
        Ok(self.inner.read().map_err(|_| poisoned())?.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Hospital>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().find(|h| h.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> DomainResult<bool> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().any(|h| h.email == email))
    }

    async fn exists_by_phone(&self, phone: &str) -> DomainResult<bool> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().any(|h| h.phone == phone))
    }

    async fn exists_by_username(&self, username: &str) -> DomainResult<bool> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().any(|h| h.username == username))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryDoctorStore {
    inner: RwLock<HashMap<DoctorId, Doctor>>,
}

impl InMemoryDoctorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DoctorStore for InMemoryDoctorStore {
    async fn create(&self, doctor: Doctor) -> DomainResult<Doctor> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if map
            .values()
            .any(|d| d.email == doctor.email || d.phone == doctor.phone)
        {
            return Err(DomainError::conflict("doctor already exists"));
        }
        map.insert(doctor.id, doctor.clone());
        Ok(doctor)
    }

    async fn update(&self, doctor: Doctor) -> DomainResult<Doctor> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if !map.contains_key(&doctor.id) {
            return Err(DomainError::not_found("doctor not found"));
        }
        map.insert(doctor.id, doctor.clone());
        Ok(doctor)
    }

    async fn find_by_id(&self, id: DoctorId) -> DomainResult<Option<Doctor>> {
        Ok(self.inner.read().map_err(|_| poisoned())?.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Doctor>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().find(|d| d.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> DomainResult<bool> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().any(|d| d.email == email))
    }

    async fn exists_by_phone(&self, phone: &str) -> DomainResult<bool> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().any(|d| d.phone == phone))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPatientStore {
    inner: RwLock<HashMap<PatientId, Patient>>,
}

impl InMemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatientStore for InMemoryPatientStore {
    async fn create(&self, patient: Patient) -> DomainResult<Patient> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if map
            .values()
            .any(|p| p.email == patient.email || p.phone == patient.phone)
        {
            return Err(DomainError::conflict("patient already exists"));
        }
        map.insert(patient.id, patient.clone());
        Ok(patient)
    }

    async fn update(&self, patient: Patient) -> DomainResult<Patient> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if !map.contains_key(&patient.id) {
            return Err(DomainError::not_found("patient not found"));
        }
        map.insert(patient.id, patient.clone());
        Ok(patient)
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Patient>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().find(|p| p.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> DomainResult<bool> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().any(|p| p.email == email))
    }

    async fn exists_by_phone(&self, phone: &str) -> DomainResult<bool> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().any(|p| p.phone == phone))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryReservationStore {
    inner: RwLock<HashMap<ReservationId, Reservation>>,
}

impl InMemoryReservationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReservationStore for InMemoryReservationStore {
    async fn create(&self, reservation: Reservation) -> DomainResult<Reservation> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        // Slot backstop: the engine's pre-check raced outside this lock.
        if map.values().any(|r| {
            r.doctor == reservation.doctor
                && r.date == reservation.date
                && r.time == reservation.time
        }) {
            return Err(DomainError::conflict(
                "doctor already has an appointment at this time",
            ));
        }
        map.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn find_by_slot(
        &self,
        doctor: DoctorId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> DomainResult<Option<Reservation>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map
            .values()
            .find(|r| r.doctor == doctor && r.date == date && r.time == time)
            .cloned())
    }
}
