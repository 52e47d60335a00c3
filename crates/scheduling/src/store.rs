//! Store seam for reservations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use wardflow_core::{DoctorId, DomainResult};

use crate::Reservation;

/// Reservation persistence capability.
///
/// `create` must reject a duplicate (doctor, date, time) with a `Conflict`:
/// the engine's pre-check races with concurrent bookings, and the store's
/// slot constraint is the authoritative backstop.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn create(&self, reservation: Reservation) -> DomainResult<Reservation>;

    async fn find_by_slot(
        &self,
        doctor: DoctorId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> DomainResult<Option<Reservation>>;
}

#[async_trait]
impl<S> ReservationStore for Arc<S>
where
    S: ReservationStore + ?Sized,
{
    async fn create(&self, reservation: Reservation) -> DomainResult<Reservation> {
        (**self).create(reservation).await
    }

    async fn find_by_slot(
        &self,
        doctor: DoctorId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> DomainResult<Option<Reservation>> {
        (**self).find_by_slot(doctor, date, time).await
    }
}
