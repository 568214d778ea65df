//! OpenAPI document for the HTTP surface.

use axum::Json;
use utoipa::OpenApi;

use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "tessera",
        description = "Credential authentication and session service"
    ),
    paths(
        handlers::health::health,
        handlers::me::me,
        handlers::auth::register::register,
        handlers::auth::login::login,
        handlers::auth::session::refresh,
        handlers::auth::session::logout,
        handlers::auth::password::change_password,
    ),
    components(schemas(
        crate::store::Account,
        handlers::ErrorResponse,
        handlers::health::Health,
        handlers::auth::types::RegisterRequest,
        handlers::auth::types::LoginRequest,
        handlers::auth::types::ChangePasswordRequest,
        handlers::auth::types::AccountResponse,
        handlers::auth::types::MessageResponse,
        handlers::auth::types::ChangePasswordResponse,
        handlers::auth::types::MeResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login, and session lifecycle"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// The generated document, exposed for the `/openapi.json` route and tooling.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub async fn serve() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi())
}
