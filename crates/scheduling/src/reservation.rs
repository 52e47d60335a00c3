//! Reservation entity.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use wardflow_core::{DoctorId, PatientId, ReservationId};

/// Progress of an appointment.
///
/// No operation mutates this beyond the initial state; reservations are
/// created `Pending` and stay there until a future scheduling surface
/// exists.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Ongoing,
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Ongoing => "ongoing",
            ReservationStatus::Completed => "completed",
        }
    }
}

/// Whether the computed fee has been settled. Payment collection is out of
/// scope; the field only ever holds its default here.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    Paid,
    #[default]
    Unpaid,
}

impl FeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeStatus::Paid => "paid",
            FeeStatus::Unpaid => "unpaid",
        }
    }
}

/// A booked appointment slot.
///
/// # Invariants
/// - `fee >= 0`.
/// - No two reservations share the same (doctor, date, time); the store
///   enforces this as the backstop for the engine's conflict check.
///
/// Holds non-owning references to the patient and doctor; their lifetimes
/// are independent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub patient: PatientId,
    pub doctor: DoctorId,
    pub fee: i64,
    pub reservation_status: ReservationStatus,
    pub fee_status: FeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Create a reservation in its initial state (pending, unpaid).
    pub fn new(
        id: ReservationId,
        date: NaiveDate,
        time: NaiveTime,
        patient: PatientId,
        doctor: DoctorId,
        fee: i64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            date,
            time,
            patient,
            doctor,
            fee,
            reservation_status: ReservationStatus::default(),
            fee_status: FeeStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_reservation_starts_pending_and_unpaid() {
        let r = Reservation::new(
            ReservationId::new(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            PatientId::new(),
            DoctorId::new(),
            5000,
            Utc::now(),
        );

        assert_eq!(r.reservation_status, ReservationStatus::Pending);
        assert_eq!(r.fee_status, FeeStatus::Unpaid);
        assert_eq!(r.created_at, r.updated_at);
    }

    #[test]
    fn status_enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_value(ReservationStatus::Pending).unwrap(),
            serde_json::json!("pending")
        );
        assert_eq!(
            serde_json::to_value(FeeStatus::Unpaid).unwrap(),
            serde_json::json!("unpaid")
        );
    }
}
