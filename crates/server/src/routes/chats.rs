use axum::{extract::{rejection::QueryRejection, Path, Query, State}, Json};
use serde::{Deserialize, Serialize};

use service::pagination::{Page, PageRequest};
use service::records::domain::{ChatDetail, ChatSummary};
use service::records::filter::ChatFilter;

use crate::errors::ApiError;
use crate::routes::auth::ServerState;

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChatQuery {
    pub page: Option<String>,
    /// JSON: `{"customer":{"name","email"},"serviceProvider":{"name","email","serviceType"}}`
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatsPage {
    pub chats: Vec<ChatSummary>,
    pub current_page: u64,
    pub total_pages: u64,
    pub message: String,
}

impl From<Page<ChatSummary>> for ChatsPage {
    fn from(p: Page<ChatSummary>) -> Self {
        Self {
            chats: p.items,
            current_page: p.current_page,
            total_pages: p.total_pages,
            message: p.message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatBody {
    pub chat: ChatDetail,
}

#[utoipa::path(
    get, path = "/api/admin/chats", tag = "chats",
    params(ChatQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "One page of chats", body = crate::openapi::ChatsPageDoc),
        (
            status = 400, description = "Invalid filter or malformed query string",
            body = crate::openapi::MessageResponse
        ),
        (status = 401, description = "Unauthorized", body = crate::openapi::MessageResponse),
        (status = 500, description = "Server error", body = crate::openapi::MessageResponse)
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ChatQuery>, QueryRejection>,
) -> Result<Json<ChatsPage>, ApiError> {
    let Query(q) = query?;
    let filter = ChatFilter::from_param(q.filter.as_deref())?;
    let page = state.records.list_chats(filter, PageRequest::from_param(q.page.as_deref())).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get, path = "/api/admin/chats/{id}", tag = "chats",
    params(("id" = String, Path, description = "Chat id")),
    security(("bearer_auth" = [])),
    responses(
        (
            status = 200, description = "Chat with customer and service provider resolved",
            body = crate::openapi::ChatBodyDoc
        ),
        (status = 404, description = "Not found", body = crate::openapi::MessageResponse)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ChatBody>, ApiError> {
    let chat = state.records.get_chat(&id).await?;
    Ok(Json(ChatBody { chat }))
}
