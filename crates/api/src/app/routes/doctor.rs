use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{patch, post},
    Json, Router,
};
use serde_json::json;

use wardflow_core::{DoctorId, DomainError, DomainResult};
use wardflow_identity::{directory, Doctor};

use crate::app::services::{dispatch_notification, AppServices};
use crate::app::{dto, errors};
use crate::context::AdminContext;
use crate::middleware::{admin_auth, AdminAuthState};

pub fn router(auth: AdminAuthState) -> Router {
    let protected = Router::new()
        .route("/create", post(create_doctor))
        .route_layer(axum::middleware::from_fn_with_state(auth, admin_auth));

    let public = Router::new()
        .route("/login", post(login_doctor))
        .route("/reset-sys-generated-password", patch(reset_system_password));

    protected.merge(public)
}

pub async fn create_doctor(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Json(body): Json<dto::CreateDoctorRequest>,
) -> Response {
    match try_create(services, admin, body).await {
        Ok(res) => res,
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn try_create(
    services: Arc<AppServices>,
    admin: AdminContext,
    body: dto::CreateDoctorRequest,
) -> DomainResult<Response> {
    let (date_of_birth, unit) = body.validate()?;

    let email = body.email.trim().to_lowercase();
    directory::ensure_doctor_unique(&services.doctors, &email, body.phone.trim()).await?;

    // The plaintext only travels to the welcome mail; the store gets the hash.
    let issued = services.credentials.issue_system_password(&services.hasher)?;

    let doctor = Doctor::register(
        DoctorId::new(),
        &body.first_name,
        &body.last_name,
        date_of_birth,
        body.is_consultant,
        unit,
        &email,
        &body.phone,
        body.img_url.clone(),
        issued.hash,
    );

    let created = services.doctors.create(doctor).await?;
    tracing::info!(admin = %admin.hospital_id(), doctor = %created.id, "doctor profile created");

    let notifier = services.notifier.clone();
    let (mail_to, full_name, system_password) =
        (created.email.clone(), created.full_name(), issued.plaintext);
    dispatch_notification(async move {
        notifier
            .doctor_welcome(&mail_to, &full_name, &system_password)
            .await
    });

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "doctor profile created successfully",
            "data": created.summary(),
        })),
    )
        .into_response())
}

pub async fn login_doctor(
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
    let doctor = services
        .doctors
        .find_by_email(&email)
        .await?
        .ok_or_else(|| DomainError::rule("invalid credentials"))?;

    // System-issued credentials are not a login; rotation comes first.
    if !doctor.has_changed_system_password {
        return Err(DomainError::rule(
            "please change your system generated password",
        ));
    }

    if !services
        .hasher
        .verify(&body.password, &doctor.password_hash)?
    {
        return Err(DomainError::rule("invalid credentials"));
    }

    let token = services
        .tokens
        .issue(*doctor.id.as_uuid())
        .map_err(|e| DomainError::internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": format!("login successful (welcome {})", doctor.full_name()),
            "data": doctor.summary(),
            "access_token": token,
        })),
    )
        .into_response())
}

pub async fn reset_system_password(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ResetSystemPasswordRequest>,
) -> Response {
    match try_reset(services, body).await {
        Ok(res) => res,
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn try_reset(
    services: Arc<AppServices>,
    body: dto::ResetSystemPasswordRequest,
) -> DomainResult<Response> {
    let doctor_id = body.validate()?;

    let mut doctor = services
        .doctors
        .find_by_id(doctor_id)
        .await?
        .ok_or_else(|| DomainError::not_found("doctor not found"))?;

    let new_hash = wardflow_credentials::verify_and_rotate(
        &services.hasher,
        doctor.has_changed_system_password,
        &doctor.password_hash,
        &body.old_password,
        &body.password,
    )?;

    doctor.complete_system_password_rotation(new_hash);
    services.doctors.update(doctor).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "account verified successfully",
            "redirect": true,
        })),
    )
        .into_response())
}
