//! Admin gate: bearer token extraction + verification + hospital lookup.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use wardflow_core::HospitalId;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::AdminContext;

#[derive(Clone)]
pub struct AdminAuthState {
    pub services: Arc<AppServices>,
}

/// Gate admin-only routes.
///
/// Verification failures (missing header, malformed/expired/badly signed
/// token) all collapse to 401; a valid token whose hospital no longer
/// exists is 403.
pub async fn admin_auth(
    State(state): State<AdminAuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer(req.headers()) else {
        return errors::envelope_error(StatusCode::UNAUTHORIZED, "unauthorized: token not found");
    };

    let subject = match state.services.tokens.verify(token) {
        Ok(subject) => subject,
        Err(_) => return errors::envelope_error(StatusCode::UNAUTHORIZED, "invalid token"),
    };

    let hospital = match state
        .services
        .hospitals
        .find_by_id(HospitalId::from_uuid(subject))
        .await
    {
        Ok(hospital) => hospital,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let Some(hospital) = hospital else {
        return errors::envelope_error(
            StatusCode::FORBIDDEN,
            "forbidden: you don't have rights to perform this action",
        );
    };

    req.extensions_mut()
        .insert(AdminContext::new(hospital.id, hospital.name));

    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        return None;
    }

    Some(token)
}
