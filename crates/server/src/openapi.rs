use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MessageResponse { pub message: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct TokenResponse { pub token: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct StatsResponse { pub total_customers: u64, pub total_service_providers: u64 }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CustomerDoc {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// RFC 3339 timestamp
    pub registration_date: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ReviewDoc {
    pub customer: Option<String>,
    pub rating: f64,
    pub comment: Option<String>,
    pub review_date: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ServiceProviderSummaryDoc {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service_type: String,
    pub rating: f64,
    pub registration_date: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ServiceProviderDoc {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service_type: String,
    pub rating: f64,
    pub reviews: Vec<ReviewDoc>,
    pub registration_date: String,
}

#[derive(ToSchema)]
pub struct CustomerRefDoc { pub id: String, pub name: String, pub email: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ServiceProviderRefDoc {
    pub id: String,
    pub name: String,
    pub email: String,
    pub service_type: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ChatSummaryDoc {
    pub id: String,
    pub customer: CustomerRefDoc,
    pub service_provider: ServiceProviderRefDoc,
    pub message_count: u64,
    pub last_updated: String,
}

#[derive(ToSchema)]
pub struct ChatMessageDoc {
    /// `customer` or `serviceProvider`
    pub sender: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ChatDetailDoc {
    pub id: String,
    pub customer: Option<CustomerDoc>,
    pub service_provider: Option<ServiceProviderDoc>,
    pub messages: Vec<ChatMessageDoc>,
    pub last_updated: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CustomersPageDoc {
    pub customers: Vec<CustomerDoc>,
    pub current_page: u64,
    pub total_pages: u64,
    pub message: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ServiceProvidersPageDoc {
    pub service_providers: Vec<ServiceProviderSummaryDoc>,
    pub current_page: u64,
    pub total_pages: u64,
    pub message: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ChatsPageDoc {
    pub chats: Vec<ChatSummaryDoc>,
    pub current_page: u64,
    pub total_pages: u64,
    pub message: String,
}

#[derive(ToSchema)]
pub struct CustomerBodyDoc { pub customer: CustomerDoc }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ServiceProviderBodyDoc { pub service_provider: ServiceProviderDoc }

#[derive(ToSchema)]
pub struct ChatBodyDoc { pub chat: ChatDetailDoc }

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            let bearer =
                HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build();
            components.add_security_scheme("bearer_auth", SecurityScheme::Http(bearer));
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::admin::dashboard,
        crate::routes::admin::stats,
        crate::routes::customers::list,
        crate::routes::customers::get,
        crate::routes::service_providers::list,
        crate::routes::service_providers::get,
        crate::routes::chats::list,
        crate::routes::chats::get,
    ),
    components(
        schemas(
            HealthResponse,
            MessageResponse,
            LoginRequest,
            TokenResponse,
            StatsResponse,
            CustomerDoc,
            ReviewDoc,
            ServiceProviderSummaryDoc,
            ServiceProviderDoc,
            CustomerRefDoc,
            ServiceProviderRefDoc,
            ChatSummaryDoc,
            ChatMessageDoc,
            ChatDetailDoc,
            CustomersPageDoc,
            ServiceProvidersPageDoc,
            ChatsPageDoc,
            CustomerBodyDoc,
            ServiceProviderBodyDoc,
            ChatBodyDoc,
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "admin"),
        (name = "customers"),
        (name = "service-providers"),
        (name = "chats")
    )
)]
pub struct ApiDoc;
