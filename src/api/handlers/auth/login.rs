//! Credential login.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::error;

use super::cookies::set_token_cookies;
use super::state::AuthState;
use super::types::{AccountResponse, LoginRequest};
use crate::api::handlers::{ErrorResponse, auth_error_response, error_response};
use crate::session::AuthError;

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, token cookies set", body = AccountResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 401, description = "Bad credentials", body = ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn login(
    state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return auth_error_response(&state, &AuthError::InvalidInput("Missing request body"));
    };
    if request.email.trim().is_empty() || request.password.is_empty() {
        return auth_error_response(
            &state,
            &AuthError::InvalidInput("Email and password are required"),
        );
    }

    let (account, pair) = match state.sessions().login(&request.email, &request.password).await {
        Ok(outcome) => outcome,
        Err(err) => return auth_error_response(&state, &err),
    };

    let mut headers = HeaderMap::new();
    if let Err(err) = set_token_cookies(&mut headers, &state, &pair) {
        error!("Failed to build session cookies: {err}");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
    }

    (
        StatusCode::OK,
        headers,
        Json(AccountResponse {
            message: "Login successful".to_string(),
            account,
        }),
    )
        .into_response()
}
