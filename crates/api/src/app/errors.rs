use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use wardflow_core::DomainError;

/// Map a domain error onto the response envelope.
///
/// Every failure body is `{ "success": false, "message": ... }`; only the
/// message text leaks out, never internals.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let status = match &err {
        DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Conflict(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Rule(_) => StatusCode::BAD_REQUEST,
        DomainError::InvalidId(_) => StatusCode::BAD_REQUEST,
        DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(%err, "request failed unexpectedly");
    }

    envelope_error(status, err.to_string())
}

pub fn envelope_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "message": message.into(),
        })),
    )
        .into_response()
}
