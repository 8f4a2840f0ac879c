//! JSON error responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use geolens_core::GeoError;
use serde::Serialize;

/// Error returned by every handler, rendered as `{ "error": message }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not found")
    }

    /// 400 naming the fields a request body lacked.
    pub fn missing_fields(fields: &[&str]) -> Self {
        Self::bad_request(format!("Missing required fields: {}", fields.join(", ")))
    }
}

impl From<GeoError> for ApiError {
    fn from(err: GeoError) -> Self {
        let status = match &err {
            GeoError::InvalidInput(_) | GeoError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            GeoError::Upstream { .. } | GeoError::HttpError(_) | GeoError::Timeout { .. } => StatusCode::BAD_GATEWAY,
            GeoError::InsufficientResults { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
        }
        Self::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: &self.message })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
