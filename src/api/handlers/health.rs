//! Liveness endpoint.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::built_info;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    status: String,
    name: String,
    version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = Health),
    ),
    tag = "health"
)]
pub async fn health() -> impl IntoResponse {
    let health = Health {
        status: "ok".to_string(),
        name: built_info::PKG_NAME.to_string(),
        version: built_info::PKG_VERSION.to_string(),
    };
    (StatusCode::OK, Json(health))
}
