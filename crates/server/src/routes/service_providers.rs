use axum::{extract::{rejection::QueryRejection, Path, Query, State}, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use service::pagination::{Page, PageRequest};
use service::records::domain::{ServiceProvider, ServiceProviderSummary};
use service::records::filter::ServiceProviderFilter;

use crate::errors::ApiError;
use crate::routes::auth::ServerState;

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProviderQuery {
    pub page: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub service_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProvidersPage {
    pub service_providers: Vec<ServiceProviderSummary>,
    pub current_page: u64,
    pub total_pages: u64,
    pub message: String,
}

impl From<Page<ServiceProviderSummary>> for ServiceProvidersPage {
    fn from(p: Page<ServiceProviderSummary>) -> Self {
        Self {
            service_providers: p.items,
            current_page: p.current_page,
            total_pages: p.total_pages,
            message: p.message,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProviderBody {
    pub service_provider: ServiceProvider,
}

/// Unlike the other listings, no match at all answers 404 (same envelope).
#[utoipa::path(
    get, path = "/api/admin/service-providers", tag = "service-providers",
    params(ServiceProviderQuery),
    security(("bearer_auth" = [])),
    responses(
        (
            status = 200, description = "One page of service providers",
            body = crate::openapi::ServiceProvidersPageDoc
        ),
        (
            status = 404, description = "No matching service providers",
            body = crate::openapi::ServiceProvidersPageDoc
        ),
        (
            status = 400, description = "Malformed query string",
            body = crate::openapi::MessageResponse
        ),
        (status = 401, description = "Unauthorized", body = crate::openapi::MessageResponse),
        (status = 500, description = "Server error", body = crate::openapi::MessageResponse)
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ServiceProviderQuery>, QueryRejection>,
) -> Result<(StatusCode, Json<ServiceProvidersPage>), ApiError> {
    let Query(q) = query?;
    let filter = ServiceProviderFilter::new(q.name, q.email, q.service_type);
    let req = PageRequest::from_param(q.page.as_deref());
    let page = state.records.list_service_providers(filter, req).await?;
    let status = if page.is_empty() { StatusCode::NOT_FOUND } else { StatusCode::OK };
    Ok((status, Json(page.into())))
}

#[utoipa::path(
    get, path = "/api/admin/service-providers/{id}", tag = "service-providers",
    params(("id" = String, Path, description = "Service provider id")),
    security(("bearer_auth" = [])),
    responses(
        (
            status = 200, description = "Service provider with reviews",
            body = crate::openapi::ServiceProviderBodyDoc
        ),
        (status = 404, description = "Not found", body = crate::openapi::MessageResponse)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ServiceProviderBody>, ApiError> {
    let service_provider = state.records.get_service_provider(&id).await?;
    Ok(Json(ServiceProviderBody { service_provider }))
}
