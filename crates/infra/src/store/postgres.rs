//! Postgres-backed stores.
//!
//! Unique indexes are the authoritative backstop for every check-then-act
//! pair upstream: identity fields (email/phone/username) and the
//! reservation slot `(doctor_id, date, time)`. A unique violation maps to
//! `Conflict`; everything else surfaces as `Internal`.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use wardflow_core::{DoctorId, DomainError, DomainResult, HospitalId};
use wardflow_identity::{
    BloodGroup, Doctor, DoctorStore, Genotype, Hospital, HospitalStore, Patient, PatientStore,
    Unit,
};
use wardflow_scheduling::{FeeStatus, Reservation, ReservationStore};

/// Create the schema if it does not exist yet.
pub async fn run_migrations(pool: &PgPool) -> DomainResult<()> {
    sqlx::raw_sql(include_str!("schema.sql"))
        .execute(pool)
        .await
        .map_err(|e| DomainError::internal(format!("migration failed: {e}")))?;
    Ok(())
}

fn store_err(e: sqlx::Error) -> DomainError {
    DomainError::internal(format!("store error: {e}"))
}

/// Unique-violation-aware mapping for inserts: the pre-check raced and the
/// constraint caught it.
fn insert_err(e: sqlx::Error, conflict_msg: &str) -> DomainError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::conflict(conflict_msg.to_string())
        }
        _ => store_err(e),
    }
}

fn column<T>(row: &PgRow, name: &str) -> DomainResult<T>
where
    T: for<'r> sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::internal(format!("bad column {name}: {e}")))
}

// ─────────────────────────────────────────────────────────────────────────────
// Hospitals
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PostgresHospitalStore {
    pool: Arc<PgPool>,
}

impl PostgresHospitalStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn row_to_hospital(row: &PgRow) -> DomainResult<Hospital> {
    Ok(Hospital {
        id: HospitalId::from_uuid(column(row, "id")?),
        name: column(row, "name")?,
        owner: column(row, "owner")?,
        address: column(row, "address")?,
        email: column(row, "email")?,
        phone: column(row, "phone")?,
        username: column(row, "username")?,
        password_hash: column(row, "password_hash")?,
        is_admin: column(row, "is_admin")?,
    })
}

#[async_trait]
impl HospitalStore for PostgresHospitalStore {
    async fn create(&self, hospital: Hospital) -> DomainResult<Hospital> {
        sqlx::query(
            r#"
            INSERT INTO hospitals (id, name, owner, address, email, phone, username, password_hash, is_admin)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(hospital.id.as_uuid())
        .bind(&hospital.name)
        .bind(&hospital.owner)
        .bind(&hospital.address)
        .bind(&hospital.email)
        .bind(&hospital.phone)
        .bind(&hospital.username)
        .bind(&hospital.password_hash)
        .bind(hospital.is_admin)
        .execute(&*self.pool)
        .await
        .map_err(|e| insert_err(e, "hospital already exists"))?;

        Ok(hospital)
    }

    async fn find_by_id(&self, id: HospitalId) -> DomainResult<Option<Hospital>> {
        let row = sqlx::query("SELECT * FROM hospitals WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(store_err)?;
        row.as_ref().map(row_to_hospital).transpose()
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Hospital>> {
        let row = sqlx::query("SELECT * FROM hospitals WHERE email = $1")
            .bind(email)
            .fetch_optional(&*self.pool)
            .await
            .map_err(store_err)?;
        row.as_ref().map(row_to_hospital).transpose()
    }

    async fn exists_by_email(&self, email: &str) -> DomainResult<bool> {
        exists(&self.pool, "SELECT 1 FROM hospitals WHERE email = $1", email).await
    }

    async fn exists_by_phone(&self, phone: &str) -> DomainResult<bool> {
        exists(&self.pool, "SELECT 1 FROM hospitals WHERE phone = $1", phone).await
    }

    async fn exists_by_username(&self, username: &str) -> DomainResult<bool> {
        exists(
            &self.pool,
            "SELECT 1 FROM hospitals WHERE username = $1",
            username,
        )
        .await
    }
}

async fn exists(pool: &PgPool, sql: &str, value: &str) -> DomainResult<bool> {
    let row = sqlx::query(sql)
        .bind(value)
        .fetch_optional(pool)
        .await
        .map_err(store_err)?;
    Ok(row.is_some())
}

// ─────────────────────────────────────────────────────────────────────────────
// Doctors
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PostgresDoctorStore {
    pool: Arc<PgPool>,
}

impl PostgresDoctorStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn row_to_doctor(row: &PgRow) -> DomainResult<Doctor> {
    let unit: String = column(row, "unit")?;
    Ok(Doctor {
        id: DoctorId::from_uuid(column(row, "id")?),
        first_name: column(row, "first_name")?,
        last_name: column(row, "last_name")?,
        date_of_birth: column(row, "date_of_birth")?,
        is_consultant: column(row, "is_consultant")?,
        unit: Unit::from_str(&unit)?,
        email: column(row, "email")?,
        phone: column(row, "phone")?,
        img_url: column(row, "img_url")?,
        password_hash: column(row, "password_hash")?,
        is_verified: column(row, "is_verified")?,
        is_active: column(row, "is_active")?,
        has_changed_system_password: column(row, "has_changed_system_password")?,
    })
}

#[async_trait]
impl DoctorStore for PostgresDoctorStore {
    async fn create(&self, doctor: Doctor) -> DomainResult<Doctor> {
        sqlx::query(
            r#"
            INSERT INTO doctors (
                id, first_name, last_name, date_of_birth, is_consultant, unit,
                email, phone, img_url, password_hash,
                is_verified, is_active, has_changed_system_password
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(doctor.id.as_uuid())
        .bind(&doctor.first_name)
        .bind(&doctor.last_name)
        .bind(doctor.date_of_birth)
        .bind(doctor.is_consultant)
        .bind(doctor.unit.as_str())
        .bind(&doctor.email)
        .bind(&doctor.phone)
        .bind(&doctor.img_url)
        .bind(&doctor.password_hash)
        .bind(doctor.is_verified)
        .bind(doctor.is_active)
        .bind(doctor.has_changed_system_password)
        .execute(&*self.pool)
        .await
        .map_err(|e| insert_err(e, "doctor already exists"))?;

        Ok(doctor)
    }

    async fn update(&self, doctor: Doctor) -> DomainResult<Doctor> {
        let result = sqlx::query(
            r#"
            UPDATE doctors SET
                first_name = $2, last_name = $3, date_of_birth = $4,
                is_consultant = $5, unit = $6, email = $7, phone = $8,
                img_url = $9, password_hash = $10,
                is_verified = $11, is_active = $12, has_changed_system_password = $13
            WHERE id = $1
            "#,
        )
        .bind(doctor.id.as_uuid())
        .bind(&doctor.first_name)
        .bind(&doctor.last_name)
        .bind(doctor.date_of_birth)
        .bind(doctor.is_consultant)
        .bind(doctor.unit.as_str())
        .bind(&doctor.email)
        .bind(&doctor.phone)
        .bind(&doctor.img_url)
        .bind(&doctor.password_hash)
        .bind(doctor.is_verified)
        .bind(doctor.is_active)
        .bind(doctor.has_changed_system_password)
        .execute(&*self.pool)
        .await
        .map_err(store_err)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("doctor not found"));
        }
        Ok(doctor)
    }

    async fn find_by_id(&self, id: DoctorId) -> DomainResult<Option<Doctor>> {
        let row = sqlx::query("SELECT * FROM doctors WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(store_err)?;
        row.as_ref().map(row_to_doctor).transpose()
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Doctor>> {
        let row = sqlx::query("SELECT * FROM doctors WHERE email = $1")
            .bind(email)
            .fetch_optional(&*self.pool)
            .await
            .map_err(store_err)?;
        row.as_ref().map(row_to_doctor).transpose()
    }

    async fn exists_by_email(&self, email: &str) -> DomainResult<bool> {
        exists(&self.pool, "SELECT 1 FROM doctors WHERE email = $1", email).await
    }

    async fn exists_by_phone(&self, phone: &str) -> DomainResult<bool> {
        exists(&self.pool, "SELECT 1 FROM doctors WHERE phone = $1", phone).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Patients
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PostgresPatientStore {
    pool: Arc<PgPool>,
}

impl PostgresPatientStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn row_to_patient(row: &PgRow) -> DomainResult<Patient> {
    let blood_group: String = column(row, "blood_group")?;
    let genotype: String = column(row, "genotype")?;
    Ok(Patient {
        id: wardflow_core::PatientId::from_uuid(column(row, "id")?),
        first_name: column(row, "first_name")?,
        last_name: column(row, "last_name")?,
        date_of_birth: column(row, "date_of_birth")?,
        blood_group: BloodGroup::from_str(&blood_group)?,
        genotype: Genotype::from_str(&genotype)?,
        email: column(row, "email")?,
        phone: column(row, "phone")?,
        img_url: column(row, "img_url")?,
        is_verified: column(row, "is_verified")?,
        password_hash: column(row, "password_hash")?,
        verify_token: column(row, "verify_token")?,
        token_expires_at: column(row, "token_expires_at")?,
    })
}

#[async_trait]
impl PatientStore for PostgresPatientStore {
    async fn create(&self, patient: Patient) -> DomainResult<Patient> {
        sqlx::query(
            r#"
            INSERT INTO patients (
                id, first_name, last_name, date_of_birth, blood_group, genotype,
                email, phone, img_url, is_verified, password_hash,
                verify_token, token_expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(patient.id.as_uuid())
        .bind(&patient.first_name)
        .bind(&patient.last_name)
        .bind(patient.date_of_birth)
        .bind(patient.blood_group.as_str())
        .bind(patient.genotype.as_str())
        .bind(&patient.email)
        .bind(&patient.phone)
        .bind(&patient.img_url)
        .bind(patient.is_verified)
        .bind(&patient.password_hash)
        .bind(&patient.verify_token)
        .bind(patient.token_expires_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| insert_err(e, "patient already exists"))?;

        Ok(patient)
    }

    async fn update(&self, patient: Patient) -> DomainResult<Patient> {
        let result = sqlx::query(
            r#"
            UPDATE patients SET
                first_name = $2, last_name = $3, date_of_birth = $4,
                blood_group = $5, genotype = $6, email = $7, phone = $8,
                img_url = $9, is_verified = $10, password_hash = $11,
                verify_token = $12, token_expires_at = $13
            WHERE id = $1
            "#,
        )
        .bind(patient.id.as_uuid())
        .bind(&patient.first_name)
        .bind(&patient.last_name)
        .bind(patient.date_of_birth)
        .bind(patient.blood_group.as_str())
        .bind(patient.genotype.as_str())
        .bind(&patient.email)
        .bind(&patient.phone)
        .bind(&patient.img_url)
        .bind(patient.is_verified)
        .bind(&patient.password_hash)
        .bind(&patient.verify_token)
        .bind(patient.token_expires_at)
        .execute(&*self.pool)
        .await
        .map_err(store_err)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("patient not found"));
        }
        Ok(patient)
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Patient>> {
        let row = sqlx::query("SELECT * FROM patients WHERE email = $1")
            .bind(email)
            .fetch_optional(&*self.pool)
            .await
            .map_err(store_err)?;
        row.as_ref().map(row_to_patient).transpose()
    }

    async fn exists_by_email(&self, email: &str) -> DomainResult<bool> {
        exists(&self.pool, "SELECT 1 FROM patients WHERE email = $1", email).await
    }

    async fn exists_by_phone(&self, phone: &str) -> DomainResult<bool> {
        exists(&self.pool, "SELECT 1 FROM patients WHERE phone = $1", phone).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reservations
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PostgresReservationStore {
    pool: Arc<PgPool>,
}

impl PostgresReservationStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn row_to_reservation(row: &PgRow) -> DomainResult<Reservation> {
    let status: String = column(row, "reservation_status")?;
    let fee_status: String = column(row, "fee_status")?;
    Ok(Reservation {
        id: wardflow_core::ReservationId::from_uuid(column(row, "id")?),
        date: column(row, "date")?,
        time: column(row, "time")?,
        patient: wardflow_core::PatientId::from_uuid(column(row, "patient_id")?),
        doctor: DoctorId::from_uuid(column(row, "doctor_id")?),
        fee: column(row, "fee")?,
        reservation_status: parse_status(&status)?,
        fee_status: parse_fee_status(&fee_status)?,
        created_at: column(row, "created_at")?,
        updated_at: column(row, "updated_at")?,
    })
}

fn parse_status(s: &str) -> DomainResult<wardflow_scheduling::ReservationStatus> {
    use wardflow_scheduling::ReservationStatus::*;
    match s {
        "pending" => Ok(Pending),
        "ongoing" => Ok(Ongoing),
        "completed" => Ok(Completed),
        _ => Err(DomainError::internal(format!(
            "unknown reservation status: {s}"
        ))),
    }
}

fn parse_fee_status(s: &str) -> DomainResult<FeeStatus> {
    match s {
        "paid" => Ok(FeeStatus::Paid),
        "unpaid" => Ok(FeeStatus::Unpaid),
        _ => Err(DomainError::internal(format!("unknown fee status: {s}"))),
    }
}

#[async_trait]
impl ReservationStore for PostgresReservationStore {
    async fn create(&self, reservation: Reservation) -> DomainResult<Reservation> {
        sqlx::query(
            r#"
            INSERT INTO reservations (
                id, date, time, patient_id, doctor_id, fee,
                reservation_status, fee_status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(reservation.id.as_uuid())
        .bind(reservation.date)
        .bind(reservation.time)
        .bind(reservation.patient.as_uuid())
        .bind(reservation.doctor.as_uuid())
        .bind(reservation.fee)
        .bind(reservation.reservation_status.as_str())
        .bind(reservation.fee_status.as_str())
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| insert_err(e, "doctor already has an appointment at this time"))?;

        Ok(reservation)
    }

    async fn find_by_slot(
        &self,
        doctor: DoctorId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> DomainResult<Option<Reservation>> {
        let row = sqlx::query(
            "SELECT * FROM reservations WHERE doctor_id = $1 AND date = $2 AND time = $3",
        )
        .bind(doctor.as_uuid())
        .bind(date)
        .bind(time)
        .fetch_optional(&*self.pool)
        .await
        .map_err(store_err)?;
        row.as_ref().map(row_to_reservation).transpose()
    }
}
