use axum::{extract::State, Extension, Json};
use common::types::MessageBody;
use service::auth::domain::AdminIdentity;
use service::records::domain::Stats;
use tracing::info;

use crate::errors::ApiError;
use crate::routes::auth::ServerState;

pub const DASHBOARD_MESSAGE: &str = "Welcome to the admin dashboard";

#[utoipa::path(
    get, path = "/api/admin/dashboard", tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Greeting", body = crate::openapi::MessageResponse),
        (status = 401, description = "Unauthorized", body = crate::openapi::MessageResponse)
    )
)]
pub async fn dashboard(Extension(admin): Extension<AdminIdentity>) -> Json<MessageBody> {
    info!(admin_id = %admin.id, "dashboard visited");
    Json(MessageBody::new(DASHBOARD_MESSAGE))
}

#[utoipa::path(
    get, path = "/api/admin/stats", tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Record counts", body = crate::openapi::StatsResponse),
        (status = 401, description = "Unauthorized", body = crate::openapi::MessageResponse),
        (status = 500, description = "Server error", body = crate::openapi::MessageResponse)
    )
)]
pub async fn stats(State(state): State<ServerState>) -> Result<Json<Stats>, ApiError> {
    Ok(Json(state.records.stats().await?))
}
