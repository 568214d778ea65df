//! Authenticated identity lookup.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::auth::principal::require_auth;
use super::auth::state::AuthState;
use super::auth::types::MeResponse;
use crate::api::handlers::{ErrorResponse, auth_error_response};

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The authenticated account", body = MeResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn me(headers: HeaderMap, state: Extension<Arc<AuthState>>) -> Response {
    let account_id = match require_auth(&headers, &state) {
        Ok(account_id) => account_id,
        Err(response) => return response,
    };

    match state.sessions().identity(account_id).await {
        Ok(account) => (StatusCode::OK, Json(MeResponse { account })).into_response(),
        Err(err) => auth_error_response(&state, &err),
    }
}
