//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use bcp_core::BcpError;

/// Generic failure body: `{ "error": message }`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// An HTTP-facing error carrying its status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<BcpError> for ApiError {
    fn from(err: BcpError) -> Self {
        let status = match &err {
            BcpError::Validation(_) => StatusCode::BAD_REQUEST,
            BcpError::NotFound(_) => StatusCode::NOT_FOUND,
            BcpError::Storage { .. } | BcpError::Background(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
        }

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::from(BcpError::from(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}
