//! Account registration.

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::state::AuthState;
use super::types::{AccountResponse, RegisterRequest};
use crate::api::handlers::{ErrorResponse, MIN_SECRET_LEN, auth_error_response, valid_email};
use crate::session::AuthError;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid input or duplicate email", body = ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn register(
    state: Extension<Arc<AuthState>>,
    payload: Option<Json<RegisterRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return auth_error_response(&state, &AuthError::InvalidInput("Missing request body"));
    };

    if let Err(err) = validate(&request) {
        return auth_error_response(&state, &err);
    }

    match state.sessions().register(&request.email, &request.password).await {
        Ok(account) => (
            StatusCode::CREATED,
            Json(AccountResponse {
                message: "User registered successfully".to_string(),
                account,
            }),
        )
            .into_response(),
        Err(err) => auth_error_response(&state, &err),
    }
}

fn validate(request: &RegisterRequest) -> Result<(), AuthError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AuthError::InvalidInput("Email and password are required"));
    }
    if !valid_email(&request.email) {
        return Err(AuthError::InvalidInput("Invalid email address"));
    }
    if request.password.len() < MIN_SECRET_LEN {
        return Err(AuthError::InvalidInput(
            "Password must be at least 6 characters",
        ));
    }
    Ok(())
}
