use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::app::services::AppServices;
use crate::middleware::AdminAuthState;

pub mod doctor;
pub mod hospital;
pub mod patient;
pub mod reservation;
pub mod system;

/// Assemble the full route tree under the common `/api/v1` prefix.
pub fn router(services: Arc<AppServices>) -> Router {
    let admin = AdminAuthState {
        services: services.clone(),
    };

    let api = Router::new()
        .nest("/hospital", hospital::router())
        .nest("/doctor", doctor::router(admin))
        .nest("/patient", patient::router())
        .nest("/reservation", reservation::router());

    Router::new()
        .route("/health", get(system::health))
        .nest("/api/v1", api)
        .layer(Extension(services))
}
