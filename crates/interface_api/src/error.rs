//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use domain_payment::PaymentError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid payment ID: {0}")]
    InvalidPaymentId(String),

    #[error("Validation error: {message}")]
    Validation { message: String, field: String },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::InvalidPaymentId(msg) => (StatusCode::BAD_REQUEST, "invalid_payment_id", msg, None),
            ApiError::Validation { message, field } => {
                (StatusCode::BAD_REQUEST, "validation_error", message, Some(vec![field]))
            }
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg, None)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Validation(e) => ApiError::Validation {
                message: e.to_string(),
                field: e.field().to_string(),
            },
            PaymentError::InvalidPaymentId(id) => {
                ApiError::InvalidPaymentId(format!("'{}' is not a payment ID", id))
            }
            PaymentError::NotFound(id) => ApiError::NotFound(format!("payment {} not found", id)),
            PaymentError::Store(e) if e.is_transient() => {
                error!(error = %e, "Payment store unavailable");
                ApiError::ServiceUnavailable("payment store is temporarily unavailable".to_string())
            }
            other => {
                error!(error = %other, "Payment request failed");
                ApiError::Internal("failed to process payment request".to_string())
            }
        }
    }
}
