//! `wardflow-scheduling` — appointment reservation engine.
//!
//! Booking validation (lead time, doctor state, slot conflicts), fee
//! computation, and the reservation entity with its store seam.

pub mod engine;
pub mod reservation;
pub mod store;

pub use engine::{combine_date_time, BookingRequest, FeeSchedule, ReservationEngine};
pub use reservation::{FeeStatus, Reservation, ReservationStatus};
pub use store::ReservationStore;
