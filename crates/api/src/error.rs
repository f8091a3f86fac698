//! HTTP error rendering.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use merch_core::ledger::LedgerError;
use merch_shared::AppError;
use serde_json::json;

/// Handler error rendered as `{"error": CODE, "message": reason}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Store failures are logged in full and shown to the client generically
        let message = match &err {
            AppError::Transient(detail) => {
                tracing::warn!(detail = %detail, "transient failure");
                "Temporarily unavailable, please retry".to_string()
            }
            AppError::Fatal(detail) => {
                tracing::error!(detail = %detail, "fatal failure");
                "Operation outcome unknown, check your balance before retrying".to_string()
            }
            AppError::Internal(detail) => {
                tracing::error!(detail = %detail, "internal error");
                "Internal server error".to_string()
            }
            other => other.message().to_string(),
        };

        let mut response = (
            status,
            Json(json!({
                "error": err.error_code(),
                "message": message,
            })),
        )
            .into_response();

        if err.is_retryable() {
            response.headers_mut().insert(
                axum::http::header::RETRY_AFTER,
                axum::http::HeaderValue::from_static("1"),
            );
        }

        response
    }
}
