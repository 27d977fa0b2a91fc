//! Response handling and error mapping.
//!
//! # Responsibilities
//! - Map handler errors to HTTP status codes
//! - Render error bodies as `{"message": "..."}`
//!
//! # Design Decisions
//! - Internal failures are logged with detail but answered with a generic message

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::store::StoreError;

/// Errors a route handler can return.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid JSON body")]
    InvalidBody,

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("failed to read request body")]
    BodyRead,

    #[error("Registro não encontrado.")]
    RecordNotFound,

    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) | ApiError::InvalidBody | ApiError::BodyRead => {
                StatusCode::BAD_REQUEST
            }
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RecordNotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, message_body(&message)).into_response()
    }
}

/// JSON body of the form `{"message": message}`.
pub fn message_body(message: &str) -> Json<serde_json::Value> {
    Json(json!({ "message": message }))
}
