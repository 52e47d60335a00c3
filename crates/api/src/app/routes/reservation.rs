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

use wardflow_core::DomainResult;
use wardflow_scheduling::BookingRequest;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/create", post(create_reservation))
}

pub async fn create_reservation(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateReservationRequest>,
) -> Response {
    match try_create(services, body).await {
        Ok(res) => res,
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn try_create(
    services: Arc<AppServices>,
    body: dto::CreateReservationRequest,
) -> DomainResult<Response> {
    let (doctor, patient) = body.validate()?;

    let request = BookingRequest {
        doctor,
        patient,
        date: body.date.trim().to_string(),
        time: body.time.trim().to_string(),
    };

    let reservation = services.engine.book(&request, Utc::now()).await?;
    tracing::info!(reservation = %reservation.id, doctor = %reservation.doctor, "reservation created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "reservation created, a mail will be sent to you with full details about the reservation",
            "reservation": reservation,
        })),
    )
        .into_response())
}
