use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::envelope::Envelope;

/// Errors surfaced to HTTP clients. Messages are client-safe; causes are logged upstream.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn invalid_id() -> Self { Self::Validation("Invalid ID format".into()) }

    pub fn invalid_value() -> Self { Self::Validation("Value must be a number".into()) }

    pub fn count_not_found(id: i32) -> Self { Self::NotFound(format!("Count with id {id} not found")) }

    pub fn endpoint_not_found() -> Self { Self::NotFound("Endpoint not found".into()) }

    pub fn internal(message: &str) -> Self { Self::Internal(message.to_string()) }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(Envelope::failure(self.to_string()))).into_response()
    }
}
