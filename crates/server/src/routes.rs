use axum::{middleware, routing::{get, post}, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;

pub mod admin;
pub mod auth;
pub mod chats;
pub mod customers;
pub mod service_providers;

pub use auth::ServerState;

pub async fn root() -> &'static str {
    "Admin Panel Backend is running"
}

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "OK", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the application router: public routes, `/api/auth`, and the
/// bearer-gated `/api/admin` group.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let auth_routes = Router::new().route("/login", post(auth::login));

    // Every admin route sits behind the bearer gate
    let admin_routes = Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/stats", get(admin::stats))
        .route("/customers", get(customers::list))
        .route("/customers/:id", get(customers::get))
        .route("/service-providers", get(service_providers::list))
        .route("/service-providers/:id", get(service_providers::get))
        .route("/chats", get(chats::list))
        .route("/chats/:id", get(chats::get))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/auth", auth_routes)
        .nest("/api/admin", admin_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx is logged at error
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
