//! Maps `sentinel_core::Error` onto HTTP responses per the status table:
//! `InvalidInput` -> 400, `NotFound` -> 404, `StorageUnavailable` -> 502,
//! `ScoringError`/`MalformedRecord`/`Internal` -> 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sentinel_core::Error;
use serde::Serialize;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, label) = match &self.0 {
            Error::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Bad Request"),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            Error::StorageUnavailable(_) => (StatusCode::BAD_GATEWAY, "Bad Gateway"),
            Error::MalformedRecord(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            Error::ScoringError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        };

        if !matches!(self.0, Error::InvalidInput(_) | Error::NotFound(_)) {
            tracing::error!(error = %self.0, "request failed");
        }

        // The inner payload, not `Display`, becomes the message: `Display`
        // prefixes every variant with its own name ("Invalid input: ..."),
        // but config validation already produces a self-describing message
        // ("Invalid configuration: ...") that shouldn't be double-prefixed.
        let message = match &self.0 {
            Error::InvalidInput(m) => m.clone(),
            Error::NotFound(m) => m.clone(),
            Error::StorageUnavailable(m) => m.clone(),
            Error::MalformedRecord(m) => m.clone(),
            Error::ScoringError(m) => m.clone(),
            Error::Internal(m) => m.clone(),
        };

        let body = ErrorBody { error: label.to_string(), message };
        (status, Json(body)).into_response()
    }
}
