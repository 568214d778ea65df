//! Refresh rotation and logout.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::error;

use super::cookies::{REFRESH_COOKIE_NAME, clear_token_cookies, extract_cookie, set_token_cookies};
use super::principal::require_auth;
use super::state::AuthState;
use super::types::MessageResponse;
use crate::api::handlers::{ErrorResponse, auth_error_response, error_response};

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "Token pair rotated, cookies replaced", body = MessageResponse),
        (status = 400, description = "No refresh cookie", body = ErrorResponse),
        (status = 401, description = "Invalid or stale refresh token", body = ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn refresh(headers: HeaderMap, state: Extension<Arc<AuthState>>) -> Response {
    let Some(presented) = extract_cookie(&headers, REFRESH_COOKIE_NAME) else {
        return error_response(StatusCode::BAD_REQUEST, "Refresh token required");
    };

    let (_account, pair) = match state.sessions().refresh(&presented).await {
        Ok(outcome) => outcome,
        Err(err) => return auth_error_response(&state, &err),
    };

    let mut response_headers = HeaderMap::new();
    if let Err(err) = set_token_cookies(&mut response_headers, &state, &pair) {
        error!("Failed to build session cookies: {err}");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
    }

    (
        StatusCode::OK,
        response_headers,
        Json(MessageResponse {
            message: "Token refreshed successfully".to_string(),
        }),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session revoked, cookies cleared", body = MessageResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn logout(headers: HeaderMap, state: Extension<Arc<AuthState>>) -> Response {
    let account_id = match require_auth(&headers, &state) {
        Ok(account_id) => account_id,
        Err(response) => return response,
    };

    if let Err(err) = state.sessions().logout(account_id).await {
        return auth_error_response(&state, &err);
    }

    // Clear the carriers even though the session record is already gone.
    let mut response_headers = HeaderMap::new();
    if let Err(err) = clear_token_cookies(&mut response_headers, &state) {
        error!("Failed to build clearing cookies: {err}");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
    }

    (
        StatusCode::OK,
        response_headers,
        Json(MessageResponse {
            message: "Logout successful".to_string(),
        }),
    )
        .into_response()
}
