use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

// ==============================================================================
// Error Type
// ==============================================================================

/// Errors that map to non-2xx responses. Only the balance endpoint and
/// the API 404 fallback use these; the signing and facilitation
/// endpoints answer failures in-band per their contracts.
pub(crate) enum AppError {
    /// Client-input error. The check-balance contract reports these as a
    /// 400 with a `statusMessage` body.
    BadRequest(String),
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "statusMessage": message })),
            )
                .into_response(),
            Self::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response(),
        }
    }
}
