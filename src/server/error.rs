//! HTTP mapping of domain errors
//!
//! Bodies are `{"error": ...}` plus upstream `details` for detector
//! failures. Internal failures get a generic message.

use crate::domain::ScrubError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Error returned by route handlers
#[derive(Debug)]
pub struct ApiError(pub ScrubError);

impl From<ScrubError> for ApiError {
    fn from(err: ScrubError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    /// HTTP status for the wrapped error
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ScrubError::InvalidInput(_) | ScrubError::InvalidPolicy(_) => StatusCode::BAD_REQUEST,
            ScrubError::UpstreamDetection { .. } => StatusCode::BAD_GATEWAY,
            ScrubError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self.0 {
            ScrubError::InvalidInput(msg) => json!({ "error": msg }),
            err @ ScrubError::InvalidPolicy(_) => json!({ "error": err.to_string() }),
            ScrubError::UpstreamDetection {
                status: upstream_status,
                message,
                details,
            } => {
                let mut body = json!({ "error": "Language service error", "message": message });
                if let Some(code) = upstream_status {
                    body["status"] = json!(code);
                }
                if let Some(details) = details {
                    body["details"] = details;
                }
                body
            }
            ScrubError::Timeout(_) => json!({ "error": "Request timed out" }),
            _ => json!({ "error": "Server error" }),
        };

        (status, Json(body)).into_response()
    }
}
