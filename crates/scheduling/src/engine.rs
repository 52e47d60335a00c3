//! Booking engine: lead-time and conflict validation plus fee computation.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use wardflow_core::{DoctorId, DomainError, DomainResult, PatientId, ReservationId};
use wardflow_identity::DoctorStore;

use crate::reservation::Reservation;
use crate::store::ReservationStore;

/// Minimum gap between booking time and appointment time.
const MIN_LEAD_MINUTES: i64 = 30;

/// Fee configuration, injected at construction (never read from the
/// environment mid-operation).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FeeSchedule {
    pub base_fee: i64,
    pub consultant_rate: i64,
}

impl FeeSchedule {
    pub fn new(base_fee: i64, consultant_rate: i64) -> Self {
        Self {
            base_fee,
            consultant_rate,
        }
    }

    /// Consultants bill at `base_fee * consultant_rate`; everyone else at
    /// `base_fee`.
    pub fn fee_for(&self, is_consultant: bool) -> i64 {
        if is_consultant {
            self.base_fee * self.consultant_rate
        } else {
            self.base_fee
        }
    }
}

/// A booking request as it arrives off the wire: date and time stay strings
/// until the engine validates them.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub doctor: DoctorId,
    pub patient: PatientId,
    pub date: String,
    pub time: String,
}

/// Combine an ISO date and an ISO time-of-day into a single instant.
///
/// The combination rule is date + literal `"T"` + time; lead-time and fee
/// logic depend on parsing exactly that composite.
pub fn combine_date_time(date: &str, time: &str) -> DomainResult<DateTime<Utc>> {
    let composite = format!("{date}T{time}");
    let parsed = NaiveDateTime::parse_from_str(&composite, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(&composite, "%Y-%m-%dT%H:%M"))
        .map_err(|_| {
            DomainError::validation(format!("invalid reservation date/time: {composite}"))
        })?;
    Ok(parsed.and_utc())
}

fn parse_date(date: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| DomainError::validation(format!("invalid reservation date: {date}")))
}

fn parse_time(time: &str) -> DomainResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .map_err(|_| DomainError::validation(format!("invalid reservation time: {time}")))
}

/// Books appointments against the doctor and reservation stores.
pub struct ReservationEngine<D, R> {
    doctors: D,
    reservations: R,
    fees: FeeSchedule,
}

impl<D, R> ReservationEngine<D, R>
where
    D: DoctorStore,
    R: ReservationStore,
{
    pub fn new(doctors: D, reservations: R, fees: FeeSchedule) -> Self {
        Self {
            doctors,
            reservations,
            fees,
        }
    }

    /// Validate and persist a reservation.
    ///
    /// Order matters: lead time is checked before the doctor is even loaded,
    /// so a too-early request fails the same way regardless of doctor
    /// validity.
    pub async fn book(
        &self,
        request: &BookingRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<Reservation> {
        let date = parse_date(&request.date)?;
        let time = parse_time(&request.time)?;
        let reservation_at = combine_date_time(&request.date, &request.time)?;

        if reservation_at < now + Duration::minutes(MIN_LEAD_MINUTES) {
            return Err(DomainError::rule(
                "reservation time must be at least 30 minutes ahead of the current time",
            ));
        }

        let doctor = self
            .doctors
            .find_by_id(request.doctor)
            .await?
            .ok_or_else(|| DomainError::not_found("doctor not found"))?;

        if !doctor.is_active {
            return Err(DomainError::rule("doctor is not active"));
        }

        if self
            .reservations
            .find_by_slot(request.doctor, date, time)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(
                "doctor already has an appointment at this time",
            ));
        }

        let fee = self.fees.fee_for(doctor.is_consultant);
        let reservation = Reservation::new(
            ReservationId::new(),
            date,
            time,
            request.patient,
            request.doctor,
            fee,
            now,
        );

        self.reservations.create(reservation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use wardflow_identity::{Doctor, Unit};

    struct StubDoctors {
        doctors: Vec<Doctor>,
    }

    #[async_trait]
    impl DoctorStore for StubDoctors {
        async fn create(&self, doctor: Doctor) -> DomainResult<Doctor> {
            Ok(doctor)
        }

        async fn update(&self, doctor: Doctor) -> DomainResult<Doctor> {
            Ok(doctor)
        }

        async fn find_by_id(&self, id: DoctorId) -> DomainResult<Option<Doctor>> {
            Ok(self.doctors.iter().find(|d| d.id == id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> DomainResult<Option<Doctor>> {
            Ok(self.doctors.iter().find(|d| d.email == email).cloned())
        }

        async fn exists_by_email(&self, email: &str) -> DomainResult<bool> {
            Ok(self.doctors.iter().any(|d| d.email == email))
        }

        async fn exists_by_phone(&self, phone: &str) -> DomainResult<bool> {
            Ok(self.doctors.iter().any(|d| d.phone == phone))
        }
    }

    #[derive(Default)]
    struct StubReservations {
        inner: Mutex<Vec<Reservation>>,
    }

    #[async_trait]
    impl ReservationStore for StubReservations {
        async fn create(&self, reservation: Reservation) -> DomainResult<Reservation> {
            self.inner.lock().unwrap().push(reservation.clone());
            Ok(reservation)
        }

        async fn find_by_slot(
            &self,
            doctor: DoctorId,
            date: NaiveDate,
            time: NaiveTime,
        ) -> DomainResult<Option<Reservation>> {
            Ok(self
                .inner
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.doctor == doctor && r.date == date && r.time == time)
                .cloned())
        }
    }

    fn doctor(active: bool, consultant: bool) -> Doctor {
        let mut d = Doctor::register(
            DoctorId::new(),
            "Ada",
            "Okafor",
            NaiveDate::from_ymd_opt(1986, 4, 12).unwrap(),
            consultant,
            Unit::Surgery,
            "ada@ward.test",
            "08030000002",
            None,
            "hash".to_string(),
        );
        if active {
            d.complete_system_password_rotation("rotated".to_string());
        }
        d
    }

    fn engine(doctors: Vec<Doctor>) -> ReservationEngine<StubDoctors, StubReservations> {
        ReservationEngine::new(
            StubDoctors { doctors },
            StubReservations::default(),
            FeeSchedule::new(2000, 3),
        )
    }

    fn request(doctor: DoctorId, date: &str, time: &str) -> BookingRequest {
        BookingRequest {
            doctor,
            patient: PatientId::new(),
            date: date.to_string(),
            time: time.to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        // Fixed instant keeps lead-time math deterministic.
        "2025-06-01T08:00:00Z".parse().unwrap()
    }

    #[tokio::test]
    async fn books_a_valid_slot_with_base_fee() {
        let d = doctor(true, false);
        let id = d.id;
        let engine = engine(vec![d]);

        let r = engine
            .book(&request(id, "2025-06-01", "09:00"), now())
            .await
            .unwrap();

        assert_eq!(r.fee, 2000);
        assert_eq!(r.reservation_status.as_str(), "pending");
        assert_eq!(r.fee_status.as_str(), "unpaid");
        assert_eq!(r.time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn consultant_fee_is_base_times_rate() {
        let d = doctor(true, true);
        let id = d.id;
        let engine = engine(vec![d]);

        let r = engine
            .book(&request(id, "2025-06-01", "09:00"), now())
            .await
            .unwrap();

        assert_eq!(r.fee, 6000);
    }

    #[tokio::test]
    async fn lead_time_violation_wins_over_unknown_doctor() {
        let engine = engine(vec![]);

        // 08:15 is only 15 minutes out; the doctor id does not exist either,
        // but lead time is checked first.
        let err = engine
            .book(&request(DoctorId::new(), "2025-06-01", "08:15"), now())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("30 minutes"));
    }

    #[tokio::test]
    async fn exactly_thirty_minutes_ahead_is_allowed() {
        let d = doctor(true, false);
        let id = d.id;
        let engine = engine(vec![d]);

        engine
            .book(&request(id, "2025-06-01", "08:30"), now())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unknown_doctor_is_not_found() {
        let engine = engine(vec![]);

        let err = engine
            .book(&request(DoctorId::new(), "2025-06-01", "09:00"), now())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn inactive_doctor_is_refused() {
        let d = doctor(false, false);
        let id = d.id;
        let engine = engine(vec![d]);

        let err = engine
            .book(&request(id, "2025-06-01", "09:00"), now())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("not active"));
    }

    #[tokio::test]
    async fn same_slot_twice_conflicts() {
        let d = doctor(true, false);
        let id = d.id;
        let engine = engine(vec![d]);

        engine
            .book(&request(id, "2025-06-01", "09:00"), now())
            .await
            .unwrap();
        let err = engine
            .book(&request(id, "2025-06-01", "09:00"), now())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn same_doctor_different_time_is_fine() {
        let d = doctor(true, false);
        let id = d.id;
        let engine = engine(vec![d]);

        engine
            .book(&request(id, "2025-06-01", "09:00"), now())
            .await
            .unwrap();
        engine
            .book(&request(id, "2025-06-01", "10:00"), now())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn malformed_date_is_a_validation_error() {
        let engine = engine(vec![]);

        let err = engine
            .book(&request(DoctorId::new(), "June 1st", "09:00"), now())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn combine_accepts_minute_and_second_precision() {
        assert_eq!(
            combine_date_time("2025-06-01", "09:00").unwrap(),
            "2025-06-01T09:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert_eq!(
            combine_date_time("2025-06-01", "09:00:30").unwrap(),
            "2025-06-01T09:00:30Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert!(combine_date_time("2025-06-01", "9am").is_err());
    }

    #[test]
    fn fee_schedule_multiplies_only_for_consultants() {
        let fees = FeeSchedule::new(2000, 3);
        assert_eq!(fees.fee_for(false), 2000);
        assert_eq!(fees.fee_for(true), 6000);
    }
}
