//! API error responses
//!
//! Every handler error renders the same JSON envelope. Parse errors on
//! the underlying artifacts surface as 500s rather than empty-success:
//! a corrupt data file should page someone, not serve an empty site.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Handler-level errors.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<sb_common::Error> for ApiError {
    fn from(err: sb_common::Error) -> Self {
        match err {
            sb_common::Error::NotFound(msg) => ApiError::NotFound(msg),
            // A missing artifact means the pipeline never ran; that is a
            // server-side problem, not a client one
            other => ApiError::Internal(other.to_string()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
