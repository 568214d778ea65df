//! Password change with global session revocation.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::error;

use super::cookies::clear_token_cookies;
use super::principal::require_auth;
use super::state::AuthState;
use super::types::{ChangePasswordRequest, ChangePasswordResponse};
use crate::api::handlers::{ErrorResponse, MIN_SECRET_LEN, auth_error_response, error_response};
use crate::session::AuthError;

#[utoipa::path(
    put,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed, all sessions revoked", body = ChangePasswordResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing token or wrong current password", body = ErrorResponse),
        (status = 404, description = "Account missing", body = ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn change_password(
    headers: HeaderMap,
    state: Extension<Arc<AuthState>>,
    payload: Option<Json<ChangePasswordRequest>>,
) -> Response {
    let account_id = match require_auth(&headers, &state) {
        Ok(account_id) => account_id,
        Err(response) => return response,
    };

    let Some(Json(request)) = payload else {
        return auth_error_response(&state, &AuthError::InvalidInput("Missing request body"));
    };
    if request.current_password.is_empty() || request.new_password.is_empty() {
        return auth_error_response(
            &state,
            &AuthError::InvalidInput("Current and new password are required"),
        );
    }
    if request.new_password.len() < MIN_SECRET_LEN {
        return auth_error_response(
            &state,
            &AuthError::InvalidInput("Password must be at least 6 characters"),
        );
    }

    if let Err(err) = state
        .sessions()
        .change_secret(account_id, &request.current_password, &request.new_password)
        .await
    {
        return auth_error_response(&state, &err);
    }

    let mut response_headers = HeaderMap::new();
    if let Err(err) = clear_token_cookies(&mut response_headers, &state) {
        error!("Failed to build clearing cookies: {err}");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
    }

    (
        StatusCode::OK,
        response_headers,
        Json(ChangePasswordResponse {
            message: "Password changed successfully".to_string(),
            note: "All sessions have been invalidated, sign in again".to_string(),
        }),
    )
        .into_response()
}
