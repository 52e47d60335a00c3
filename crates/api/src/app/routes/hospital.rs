use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use wardflow_core::{DomainError, DomainResult, HospitalId};
use wardflow_identity::{directory, Hospital};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/create", post(create_hospital))
        .route("/login", post(login_hospital))
}

pub async fn create_hospital(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateHospitalRequest>,
) -> Response {
    match try_create(services, body).await {
        Ok(res) => res,
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn try_create(
    services: Arc<AppServices>,
    body: dto::CreateHospitalRequest,
) -> DomainResult<Response> {
    body.validate()?;

    let email = body.email.trim().to_lowercase();
    directory::ensure_hospital_unique(
        &services.hospitals,
        &email,
        body.phone.trim(),
        body.username.trim(),
    )
    .await?;

    let password_hash = wardflow_credentials::set_password(&services.hasher, &body.password)?;
    let hospital = Hospital::register(
        HospitalId::new(),
        &body.name,
        &body.owner,
        &body.address,
        &email,
        &body.phone,
        &body.username,
        password_hash,
    );

    let created = services.hospitals.create(hospital).await?;
    tracing::info!(hospital = %created.id, "hospital registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "hospital created successfully",
            "data": created.summary(),
        })),
    )
        .into_response())
}

pub async fn login_hospital(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> Response {
    match try_login(services, body).await {
        Ok(res) => res,
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn try_login(services: Arc<AppServices>, body: dto::LoginRequest) -> DomainResult<Response> {
    body.validate()?;

    let email = body.email.trim().to_lowercase();
    let hospital = services
        .hospitals
        .find_by_email(&email)
        .await?
        .ok_or_else(|| DomainError::rule("invalid credentials"))?;

    if !services
        .hasher
        .verify(&body.password, &hospital.password_hash)?
    {
        return Err(DomainError::rule("invalid credentials"));
    }

    let token = services
        .tokens
        .issue(*hospital.id.as_uuid())
        .map_err(|e| DomainError::internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": format!("login successful (welcome {})", hospital.name),
            "data": hospital.summary(),
            "access_token": token,
        })),
    )
        .into_response())
}
