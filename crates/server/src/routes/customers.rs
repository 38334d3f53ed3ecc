use axum::{extract::{rejection::QueryRejection, Path, Query, State}, Json};
use serde::{Deserialize, Serialize};

use service::pagination::{Page, PageRequest};
use service::records::domain::Customer;
use service::records::filter::CustomerFilter;

use crate::errors::ApiError;
use crate::routes::auth::ServerState;

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CustomerQuery {
    /// 1-based page; anything unparsable means 1
    pub page: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomersPage {
    pub customers: Vec<Customer>,
    pub current_page: u64,
    pub total_pages: u64,
    pub message: String,
}

impl From<Page<Customer>> for CustomersPage {
    fn from(p: Page<Customer>) -> Self {
        Self {
            customers: p.items,
            current_page: p.current_page,
            total_pages: p.total_pages,
            message: p.message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerBody {
    pub customer: Customer,
}

#[utoipa::path(
    get, path = "/api/admin/customers", tag = "customers",
    params(CustomerQuery),
    security(("bearer_auth" = [])),
    responses(
        (
            status = 200, description = "One page of customers",
            body = crate::openapi::CustomersPageDoc
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
    query: Result<Query<CustomerQuery>, QueryRejection>,
) -> Result<Json<CustomersPage>, ApiError> {
    let Query(q) = query?;
    let filter = CustomerFilter::new(q.name, q.email);
    let req = PageRequest::from_param(q.page.as_deref());
    let page = state.records.list_customers(filter, req).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get, path = "/api/admin/customers/{id}", tag = "customers",
    params(("id" = String, Path, description = "Customer id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Customer", body = crate::openapi::CustomerBodyDoc),
        (status = 404, description = "Not found", body = crate::openapi::MessageResponse)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerBody>, ApiError> {
    let customer = state.records.get_customer(&id).await?;
    Ok(Json(CustomerBody { customer }))
}
