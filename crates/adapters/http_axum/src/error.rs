//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use knxbell_domain::error::{BridgeError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`BridgeError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(BridgeError);

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            BridgeError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            BridgeError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            BridgeError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            BridgeError::Transport(err) => {
                tracing::error!(error = %err, "transport error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
