//! Route handlers and shared validation helpers.

pub mod auth;
pub mod health;
pub mod me;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::session::AuthError;
use auth::state::AuthState;

/// Secrets shorter than this are rejected at the boundary.
pub const MIN_SECRET_LEN: usize = 6;

/// Error body shared by every failure response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Lightweight email sanity check used before touching the store.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Build a `{error, message}` failure response for a status code.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    let body = ErrorResponse {
        error: status
            .canonical_reason()
            .unwrap_or("Unknown Error")
            .to_string(),
        message: message.to_string(),
    };
    (status, Json(body)).into_response()
}

/// Convert an auth failure into its wire response. Internal detail is only
/// surfaced in development mode; production gets a redacted message.
pub(crate) fn auth_error_response(state: &AuthState, err: &AuthError) -> Response {
    let status = err.status();
    if let AuthError::Internal(inner) = err {
        error!("Internal error handling request: {inner:?}");
        let message = if state.config().development() {
            inner.to_string()
        } else {
            "Internal server error".to_string()
        };
        return error_response(status, &message);
    }
    error_response(status, &err.to_string())
}

/// Catch-all for unmapped paths.
pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Endpoint not found")
}
