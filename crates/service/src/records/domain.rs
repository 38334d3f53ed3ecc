use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use models::chat_history::Sender;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub registration_date: DateTime<Utc>,
}

/// Service provider as listed: everything except the review log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProviderSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service_type: String,
    pub rating: f64,
    pub registration_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProvider {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service_type: String,
    pub rating: f64,
    pub reviews: Vec<Review>,
    pub registration_date: DateTime<Utc>,
}

impl ServiceProvider {
    pub fn summary(&self) -> ServiceProviderSummary {
        ServiceProviderSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            service_type: self.service_type.clone(),
            rating: self.rating,
            registration_date: self.registration_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub customer: Option<String>,
    pub rating: f64,
    pub comment: Option<String>,
    pub review_date: DateTime<Utc>,
}

/// Customer fields shown next to a chat in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRef {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Service provider fields shown next to a chat in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProviderRef {
    pub id: String,
    pub name: String,
    pub email: String,
    pub service_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub id: String,
    pub customer: CustomerRef,
    pub service_provider: ServiceProviderRef,
    pub message_count: u64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// A chat with both references resolved. A reference whose record is gone
/// resolves to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatDetail {
    pub id: String,
    pub customer: Option<Customer>,
    pub service_provider: Option<ServiceProvider>,
    pub messages: Vec<ChatMessage>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_customers: u64,
    pub total_service_providers: u64,
}

impl From<&Customer> for CustomerRef {
    fn from(c: &Customer) -> Self {
        Self { id: c.id.clone(), name: c.name.clone(), email: c.email.clone() }
    }
}

impl From<&ServiceProvider> for ServiceProviderRef {
    fn from(sp: &ServiceProvider) -> Self {
        Self {
            id: sp.id.clone(),
            name: sp.name.clone(),
            email: sp.email.clone(),
            service_type: sp.service_type.clone(),
        }
    }
}

impl From<models::customer::Customer> for Customer {
    fn from(c: models::customer::Customer) -> Self {
        Self {
            id: c.id.to_hex(),
            name: c.name,
            email: c.email,
            phone: c.phone,
            registration_date: c.registration_date.to_chrono(),
        }
    }
}

impl From<models::service_provider::Review> for Review {
    fn from(r: models::service_provider::Review) -> Self {
        Self {
            customer: r.customer.map(|id| id.to_hex()),
            rating: r.rating,
            comment: r.comment,
            review_date: r.review_date.to_chrono(),
        }
    }
}

impl From<models::service_provider::ServiceProvider> for ServiceProvider {
    fn from(sp: models::service_provider::ServiceProvider) -> Self {
        Self {
            id: sp.id.to_hex(),
            name: sp.name,
            email: sp.email,
            phone: sp.phone,
            service_type: sp.service_type,
            rating: sp.rating,
            reviews: sp.reviews.into_iter().map(Review::from).collect(),
            registration_date: sp.registration_date.to_chrono(),
        }
    }
}

impl From<models::chat_history::ChatMessage> for ChatMessage {
    fn from(m: models::chat_history::ChatMessage) -> Self {
        Self { sender: m.sender, message: m.message, timestamp: m.timestamp.to_chrono() }
    }
}
