use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde_json::json;

use wardflow_core::{DomainError, DomainResult, PatientId};
use wardflow_credentials::{consume_timed_token, set_password};
use wardflow_identity::{directory, Patient};

use crate::app::services::{dispatch_notification, AppServices};
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/create", post(create_patient))
        .route("/verify-account", post(verify_account))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/login", post(login_patient))
}

pub async fn create_patient(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreatePatientRequest>,
) -> Response {
    match try_create(services, body).await {
        Ok(res) => res,
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn try_create(
    services: Arc<AppServices>,
    body: dto::CreatePatientRequest,
) -> DomainResult<Response> {
    let (date_of_birth, blood_group, genotype) = body.validate()?;

    let email = body.email.trim().to_lowercase();
    directory::ensure_patient_unique(&services.patients, &email, body.phone.trim()).await?;

    let password_hash = set_password(&services.hasher, &body.password)?;
    let token = services
        .credentials
        .issue_timed_token(&services.hasher, Utc::now())?;

    let patient = Patient::register(
        PatientId::new(),
        &body.first_name,
        &body.last_name,
        date_of_birth,
        blood_group,
        genotype,
        &email,
        &body.phone,
        password_hash,
        token.hash,
        token.expires_at,
    );

    let created = services.patients.create(patient).await?;
    tracing::info!(patient = %created.id, "patient profile created");

    let notifier = services.notifier.clone();
    let (mail_to, full_name, verify_token) =
        (created.email.clone(), created.full_name(), token.plaintext);
    dispatch_notification(async move {
        notifier
            .patient_welcome(&mail_to, &full_name, &verify_token)
            .await
    });

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "patient profile created successfully",
            "data": created.summary(),
        })),
    )
        .into_response())
}

pub async fn verify_account(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::VerifyAccountRequest>,
) -> Response {
    match try_verify(services, body).await {
        Ok(res) => res,
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn try_verify(
    services: Arc<AppServices>,
    body: dto::VerifyAccountRequest,
) -> DomainResult<Response> {
    body.validate()?;

    let email = body.email.trim().to_lowercase();
    let mut patient = services
        .patients
        .find_by_email(&email)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("patient with email: {email} not found")))?;

    if patient.is_verified {
        return Err(DomainError::rule(format!(
            "patient with email: {email} already verified"
        )));
    }

    consume_timed_token(
        &services.hasher,
        patient.verify_token.as_deref(),
        patient.token_expires_at,
        &body.token,
        Utc::now(),
    )?;

    patient.mark_verified();
    services.patients.update(patient).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "account verified successfully",
        })),
    )
        .into_response())
}

pub async fn forgot_password(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ForgotPasswordRequest>,
) -> Response {
    match try_forgot(services, body).await {
        Ok(res) => res,
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn try_forgot(
    services: Arc<AppServices>,
    body: dto::ForgotPasswordRequest,
) -> DomainResult<Response> {
    body.validate()?;

    let email = body.email.trim().to_lowercase();
    let mut patient = services
        .patients
        .find_by_email(&email)
        .await?
        .ok_or_else(|| {
            DomainError::not_found(format!("email: {email} does not exist on our records"))
        })?;

    let token = services
        .credentials
        .issue_timed_token(&services.hasher, Utc::now())?;
    patient.issue_token(token.hash, token.expires_at);

    let patient = services.patients.update(patient).await?;

    let notifier = services.notifier.clone();
    let (mail_to, full_name, reset_token) =
        (patient.email.clone(), patient.full_name(), token.plaintext);
    dispatch_notification(async move {
        notifier
            .password_reset_requested(&mail_to, &full_name, &reset_token)
            .await
    });

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": format!("verification token has been sent to {email}"),
        })),
    )
        .into_response())
}

pub async fn reset_password(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ResetPasswordRequest>,
) -> Response {
    match try_reset(services, body).await {
        Ok(res) => res,
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn try_reset(
    services: Arc<AppServices>,
    body: dto::ResetPasswordRequest,
) -> DomainResult<Response> {
    body.validate()?;

    let email = body.email.trim().to_lowercase();
    let mut patient = services
        .patients
        .find_by_email(&email)
        .await?
        .ok_or_else(|| {
            DomainError::not_found(format!("patient with email: {email} does not exist"))
        })?;

    consume_timed_token(
        &services.hasher,
        patient.verify_token.as_deref(),
        patient.token_expires_at,
        &body.token,
        Utc::now(),
    )?;

    let password_hash = set_password(&services.hasher, &body.password)?;
    patient.set_password_hash(password_hash);
    patient.clear_token();

    let patient = services.patients.update(patient).await?;

    let notifier = services.notifier.clone();
    let (mail_to, full_name) = (patient.email.clone(), patient.full_name());
    dispatch_notification(async move {
        notifier.password_reset_completed(&mail_to, &full_name).await
    });

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "password reset successfully",
        })),
    )
        .into_response())
}

pub async fn login_patient(
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
    let patient = services
        .patients
        .find_by_email(&email)
        .await?
        .ok_or_else(|| DomainError::rule("invalid credentials"))?;

    if !services
        .hasher
        .verify(&body.password, &patient.password_hash)?
    {
        return Err(DomainError::rule("invalid credentials"));
    }

    let token = services
        .tokens
        .issue(*patient.id.as_uuid())
        .map_err(|e| DomainError::internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": format!("login successful (welcome {})", patient.full_name()),
            "data": patient.summary(),
            "access_token": token,
        })),
    )
        .into_response())
}
