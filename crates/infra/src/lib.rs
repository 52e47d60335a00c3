//! `wardflow-infra` — collaborator implementations.
//!
//! Everything the domain crates treat as a capability seam lands here:
//! the bcrypt hasher, the notification dispatcher, and the entity stores
//! (in-memory for tests/dev, Postgres for production).

pub mod hasher;
pub mod notify;
pub mod store;

pub use hasher::BcryptHasher;
pub use notify::{Notifier, TracingNotifier};
pub use store::in_memory::{
    InMemoryDoctorStore, InMemoryHospitalStore, InMemoryPatientStore, InMemoryReservationStore,
};
pub use store::postgres::{
    run_migrations, PostgresDoctorStore, PostgresHospitalStore, PostgresPatientStore,
    PostgresReservationStore,
};
