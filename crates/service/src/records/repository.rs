use async_trait::async_trait;

use super::domain::{ChatDetail, ChatSummary, Customer, ServiceProvider, ServiceProviderSummary};
use super::filter::{ChatFilter, CustomerFilter, ServiceProviderFilter};
use crate::errors::ServiceError;

/// Read-only storage seam for the three record collections.
///
/// Ids are the hex form of the stored object id; an id that cannot exist
/// (wrong shape) is reported as `Ok(None)`, never as an error.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    async fn count_customers(&self, filter: &CustomerFilter) -> Result<u64, ServiceError>;
    async fn find_customers(
        &self,
        filter: &CustomerFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Customer>, ServiceError>;
    async fn get_customer(&self, id: &str) -> Result<Option<Customer>, ServiceError>;

    async fn count_service_providers(
        &self,
        filter: &ServiceProviderFilter,
    ) -> Result<u64, ServiceError>;
    async fn find_service_providers(
        &self,
        filter: &ServiceProviderFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<ServiceProviderSummary>, ServiceError>;
    async fn get_service_provider(&self, id: &str) -> Result<Option<ServiceProvider>, ServiceError>;

    /// Join chats to their customer and service provider, filter on the joined
    /// fields, then return the match count and one slice in a single pass.
    /// Chats whose references do not resolve are left out.
    async fn chat_window(
        &self,
        filter: &ChatFilter,
        skip: u64,
        limit: u64,
    ) -> Result<(u64, Vec<ChatSummary>), ServiceError>;
    async fn get_chat(&self, id: &str) -> Result<Option<ChatDetail>, ServiceError>;
}

/// In-memory repository for tests and local demos. Enforces the same
/// invariants the database schema does (unique emails, review rating range,
/// chat references must name existing records when inserted).
pub mod mock {
    use super::*;
    use bson::oid::ObjectId;
    use chrono::{DateTime, Utc};
    use std::sync::{Mutex, MutexGuard};

    use crate::records::domain::{ChatMessage, CustomerRef, Review, Sender, ServiceProviderRef};

    #[derive(Debug, Clone)]
    struct StoredChat {
        id: String,
        customer: String,
        service_provider: String,
        messages: Vec<ChatMessage>,
        last_updated: DateTime<Utc>,
    }

    #[derive(Default)]
    struct Store {
        customers: Vec<Customer>,
        providers: Vec<ServiceProvider>,
        chats: Vec<StoredChat>,
        failure: Option<String>,
    }

    #[derive(Default)]
    pub struct InMemoryRecordRepository {
        inner: Mutex<Store>,
    }

    fn page<T: Clone>(items: impl Iterator<Item = T>, skip: u64, limit: u64) -> Vec<T> {
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        items.skip(skip).take(limit).collect()
    }

    impl InMemoryRecordRepository {
        pub fn new() -> Self { Self::default() }

        fn store(&self) -> Result<MutexGuard<'_, Store>, ServiceError> {
            let guard = self.inner.lock().map_err(|e| ServiceError::Db(e.to_string()))?;
            if let Some(msg) = guard.failure.clone() {
                return Err(ServiceError::Db(msg));
            }
            Ok(guard)
        }

        /// Make every following read fail with a storage error (or clear it).
        pub fn set_failure(&self, failure: Option<&str>) {
            let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            guard.failure = failure.map(str::to_string);
        }

        pub fn add_customer(
            &self,
            name: &str,
            email: &str,
            phone: &str,
        ) -> Result<Customer, ServiceError> {
            models::validate_email(email)?;
            let mut store = self.store()?;
            if store.customers.iter().any(|c| c.email == email) {
                return Err(ServiceError::Validation(format!("duplicate customer email: {email}")));
            }
            let customer = Customer {
                id: ObjectId::new().to_hex(),
                name: name.to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
                registration_date: Utc::now(),
            };
            store.customers.push(customer.clone());
            Ok(customer)
        }

        pub fn add_service_provider(
            &self,
            name: &str,
            email: &str,
            phone: &str,
            service_type: &str,
            reviews: Vec<Review>,
        ) -> Result<ServiceProvider, ServiceError> {
            models::validate_email(email)?;
            for r in &reviews {
                models::service_provider::validate_rating(r.rating)?;
            }
            let mut store = self.store()?;
            if store.providers.iter().any(|p| p.email == email) {
                return Err(ServiceError::Validation(format!(
                    "duplicate service provider email: {email}"
                )));
            }
            let rating = if reviews.is_empty() {
                0.0
            } else {
                reviews.iter().map(|r| r.rating).sum::<f64>() / reviews.len() as f64
            };
            let provider = ServiceProvider {
                id: ObjectId::new().to_hex(),
                name: name.to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
                service_type: service_type.to_string(),
                rating,
                reviews,
                registration_date: Utc::now(),
            };
            store.providers.push(provider.clone());
            Ok(provider)
        }

        /// Store a chat; each message is `(sender, text)` stamped with the current time.
        pub fn add_chat(
            &self,
            customer_id: &str,
            provider_id: &str,
            messages: &[(Sender, &str)],
        ) -> Result<String, ServiceError> {
            let mut store = self.store()?;
            if !store.customers.iter().any(|c| c.id == customer_id) {
                return Err(ServiceError::Validation(format!("unknown customer {customer_id}")));
            }
            if !store.providers.iter().any(|p| p.id == provider_id) {
                return Err(ServiceError::Validation(format!(
                    "unknown service provider {provider_id}"
                )));
            }
            let now = Utc::now();
            let chat = StoredChat {
                id: ObjectId::new().to_hex(),
                customer: customer_id.to_string(),
                service_provider: provider_id.to_string(),
                messages: messages
                    .iter()
                    .map(|(sender, text)| ChatMessage {
                        sender: *sender,
                        message: text.to_string(),
                        timestamp: now,
                    })
                    .collect(),
                last_updated: now,
            };
            let id = chat.id.clone();
            store.chats.push(chat);
            Ok(id)
        }

        /// Drop a customer record, leaving any chats that reference it dangling.
        pub fn remove_customer(&self, id: &str) -> Result<bool, ServiceError> {
            let mut store = self.store()?;
            let before = store.customers.len();
            store.customers.retain(|c| c.id != id);
            Ok(store.customers.len() != before)
        }
    }

    #[async_trait]
    impl RecordRepository for InMemoryRecordRepository {
        async fn count_customers(&self, filter: &CustomerFilter) -> Result<u64, ServiceError> {
            let store = self.store()?;
            Ok(store.customers.iter().filter(|c| filter.matches(c)).count() as u64)
        }

        async fn find_customers(
            &self,
            filter: &CustomerFilter,
            skip: u64,
            limit: u64,
        ) -> Result<Vec<Customer>, ServiceError> {
            let store = self.store()?;
            Ok(page(store.customers.iter().filter(|c| filter.matches(c)).cloned(), skip, limit))
        }

        async fn get_customer(&self, id: &str) -> Result<Option<Customer>, ServiceError> {
            let store = self.store()?;
            Ok(store.customers.iter().find(|c| c.id == id).cloned())
        }

        async fn count_service_providers(
            &self,
            filter: &ServiceProviderFilter,
        ) -> Result<u64, ServiceError> {
            let store = self.store()?;
            Ok(store.providers.iter().filter(|p| filter.matches(&p.summary())).count() as u64)
        }

        async fn find_service_providers(
            &self,
            filter: &ServiceProviderFilter,
            skip: u64,
            limit: u64,
        ) -> Result<Vec<ServiceProviderSummary>, ServiceError> {
            let store = self.store()?;
            let matching =
                store.providers.iter().map(ServiceProvider::summary).filter(|s| filter.matches(s));
            Ok(page(matching, skip, limit))
        }

        async fn get_service_provider(
            &self,
            id: &str,
        ) -> Result<Option<ServiceProvider>, ServiceError> {
            let store = self.store()?;
            Ok(store.providers.iter().find(|p| p.id == id).cloned())
        }

        async fn chat_window(
            &self,
            filter: &ChatFilter,
            skip: u64,
            limit: u64,
        ) -> Result<(u64, Vec<ChatSummary>), ServiceError> {
            let store = self.store()?;
            let joined: Vec<ChatSummary> = store
                .chats
                .iter()
                .filter_map(|chat| {
                    let customer = store.customers.iter().find(|c| c.id == chat.customer)?;
                    let provider = store.providers.iter().find(|p| p.id == chat.service_provider)?;
                    filter.matches(customer, &provider.summary()).then(|| ChatSummary {
                        id: chat.id.clone(),
                        customer: CustomerRef::from(customer),
                        service_provider: ServiceProviderRef::from(provider),
                        message_count: chat.messages.len() as u64,
                        last_updated: chat.last_updated,
                    })
                })
                .collect();
            let total = joined.len() as u64;
            Ok((total, page(joined.into_iter(), skip, limit)))
        }

        async fn get_chat(&self, id: &str) -> Result<Option<ChatDetail>, ServiceError> {
            let store = self.store()?;
            Ok(store.chats.iter().find(|c| c.id == id).map(|chat| ChatDetail {
                id: chat.id.clone(),
                customer: store.customers.iter().find(|c| c.id == chat.customer).cloned(),
                service_provider: store
                    .providers
                    .iter()
                    .find(|p| p.id == chat.service_provider)
                    .cloned(),
                messages: chat.messages.clone(),
                last_updated: chat.last_updated,
            }))
        }
    }

}
