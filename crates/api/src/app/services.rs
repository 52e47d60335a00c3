//! Capability wiring for the HTTP layer.

use std::future::Future;
use std::sync::Arc;

use sqlx::PgPool;

use wardflow_auth::{Hs256TokenIssuer, TokenIssuer};
use wardflow_credentials::{CredentialPolicy, Hasher};
use wardflow_identity::{DoctorStore, HospitalStore, PatientStore};
use wardflow_infra::{
    BcryptHasher, InMemoryDoctorStore, InMemoryHospitalStore, InMemoryPatientStore,
    InMemoryReservationStore, Notifier, PostgresDoctorStore, PostgresHospitalStore,
    PostgresPatientStore, PostgresReservationStore, TracingNotifier,
};
use wardflow_scheduling::{ReservationEngine, ReservationStore};

use crate::config::AppConfig;

/// Everything the handlers need, behind capability seams.
pub struct AppServices {
    pub hospitals: Arc<dyn HospitalStore>,
    pub doctors: Arc<dyn DoctorStore>,
    pub patients: Arc<dyn PatientStore>,
    pub hasher: Arc<dyn Hasher>,
    pub notifier: Arc<dyn Notifier>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub credentials: CredentialPolicy,
    pub engine: ReservationEngine<Arc<dyn DoctorStore>, Arc<dyn ReservationStore>>,
}

impl AppServices {
    /// In-memory stores + log-only notifier (dev and tests).
    pub fn in_memory(cfg: &AppConfig) -> Self {
        Self::assemble(
            Arc::new(InMemoryHospitalStore::new()),
            Arc::new(InMemoryDoctorStore::new()),
            Arc::new(InMemoryPatientStore::new()),
            Arc::new(InMemoryReservationStore::new()),
            Arc::new(BcryptHasher::new()),
            Arc::new(TracingNotifier),
            cfg,
        )
    }

    /// Postgres-backed stores (production).
    pub fn postgres(pool: PgPool, cfg: &AppConfig) -> Self {
        Self::assemble(
            Arc::new(PostgresHospitalStore::new(pool.clone())),
            Arc::new(PostgresDoctorStore::new(pool.clone())),
            Arc::new(PostgresPatientStore::new(pool.clone())),
            Arc::new(PostgresReservationStore::new(pool)),
            Arc::new(BcryptHasher::new()),
            Arc::new(TracingNotifier),
            cfg,
        )
    }

    /// Explicit wiring; tests use this to swap in capturing collaborators.
    pub fn assemble(
        hospitals: Arc<dyn HospitalStore>,
        doctors: Arc<dyn DoctorStore>,
        patients: Arc<dyn PatientStore>,
        reservations: Arc<dyn ReservationStore>,
        hasher: Arc<dyn Hasher>,
        notifier: Arc<dyn Notifier>,
        cfg: &AppConfig,
    ) -> Self {
        let tokens: Arc<dyn TokenIssuer> = Arc::new(Hs256TokenIssuer::new(
            cfg.jwt_secret.as_bytes(),
            cfg.token_ttl,
        ));
        let engine = ReservationEngine::new(doctors.clone(), reservations, cfg.fees);

        Self {
            hospitals,
            doctors,
            patients,
            hasher,
            notifier,
            tokens,
            credentials: cfg.credentials,
            engine,
        }
    }
}

/// Queue a fire-and-forget notification after the response is committed.
///
/// Dispatch failure is logged and swallowed; it never affects the response
/// that triggered it.
pub fn dispatch_notification<F>(fut: F)
where
    F: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(err) = fut.await {
            tracing::warn!(%err, "notification dispatch failed");
        }
    });
}
