//! HTTP application wiring (axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: capability wiring (stores, hasher, notifier, tokens, engine)
//! - `routes/`: HTTP routes + handlers (one file per actor area)
//! - `dto.rs`: request DTOs and their shape validation
//! - `errors.rs`: consistent JSON-envelope error responses

use std::sync::Arc;

use axum::Router;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(services: Arc<services::AppServices>) -> Router {
    routes::router(services)
}
