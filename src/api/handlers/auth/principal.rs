//! Authenticated principal extraction from the access cookie.

use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;

use super::cookies::{ACCESS_COOKIE_NAME, extract_cookie};
use super::state::AuthState;
use crate::api::handlers::error_response;

/// Resolve the access cookie into an account identifier.
///
/// Returns 401 for both a missing and an invalid token; only the message
/// differs.
pub(crate) fn require_auth(headers: &HeaderMap, state: &AuthState) -> Result<i64, Response> {
    let Some(token) = extract_cookie(headers, ACCESS_COOKIE_NAME) else {
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            "Access token required",
        ));
    };
    state
        .sessions()
        .verify_access(&token)
        .map_err(|err| crate::api::handlers::auth_error_response(state, &err))
}
