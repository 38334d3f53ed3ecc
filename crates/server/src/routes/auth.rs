use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Json,
};
use configs::AuthSettings;
use tracing::{debug, warn};

use service::auth::domain::{LoginInput, LoginOutput};
use service::auth::repository::AuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::auth::token::bearer_token;
use service::auth::TokenService;
use service::records::repository::RecordRepository;
use service::records::RecordsService;

use crate::errors::ApiError;

/// Shared handler state: both services sit on trait-object repositories so
/// tests can swap MongoDB for in-memory stores.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<dyn AuthRepository>>,
    pub records: Arc<RecordsService<dyn RecordRepository>>,
}

impl ServerState {
    pub fn new(
        auth_repo: Arc<dyn AuthRepository>,
        records_repo: Arc<dyn RecordRepository>,
        settings: &AuthSettings,
    ) -> Self {
        let cfg = AuthConfig { uniform_login_errors: settings.uniform_login_errors };
        Self {
            auth: Arc::new(AuthService::new(auth_repo, TokenService::from_settings(settings), cfg)),
            records: Arc::new(RecordsService::new(records_repo)),
        }
    }
}

/// A missing or unreadable body is treated like empty credentials.
#[utoipa::path(
    post, path = "/api/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = crate::openapi::TokenResponse),
        (
            status = 400, description = "Invalid Email / Invalid credentials",
            body = crate::openapi::MessageResponse
        ),
        (status = 500, description = "Server error", body = crate::openapi::MessageResponse)
    )
)]
pub async fn login(
    State(state): State<ServerState>,
    body: Option<Json<LoginInput>>,
) -> Result<Json<LoginOutput>, ApiError> {
    let input = body.map(|Json(b)| b).unwrap_or_default();
    let out = state.auth.login(input).await?;
    Ok(Json(out))
}

/// Gate for `/api/admin`: requires `Authorization: Bearer <token>` and puts the
/// verified [`service::auth::domain::AdminIdentity`] into the request extensions.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let token = bearer_token(header).map_err(|e| {
        warn!(path = %req.uri().path(), "missing bearer token");
        e
    })?;
    let identity = state.auth.verify_token(token)?;
    debug!(admin_id = %identity.id, "admin authorized");
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
