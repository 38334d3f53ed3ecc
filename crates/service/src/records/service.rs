use std::sync::Arc;

use tracing::{error, instrument};

use super::domain::{
    ChatDetail, ChatSummary, Customer, ServiceProvider, ServiceProviderSummary, Stats,
};
use super::filter::{ChatFilter, CustomerFilter, ServiceProviderFilter};
use super::listing::{ChatListing, CustomerListing, ServiceProviderListing};
use super::repository::RecordRepository;
use super::{CHATS_MESSAGE, CUSTOMERS_MESSAGE, SERVICE_PROVIDERS_MESSAGE};
use crate::errors::ServiceError;
use crate::pagination::{paginate, Page, PageRequest};

/// Application service behind the admin read endpoints.
pub struct RecordsService<R: RecordRepository + ?Sized> {
    repo: Arc<R>,
}

fn logged<T>(op: &'static str, res: Result<T, ServiceError>) -> Result<T, ServiceError> {
    if let Err(e @ (ServiceError::Db(_) | ServiceError::Model(_))) = &res {
        error!(op, err = %e, "storage failure");
    }
    res
}

impl<R: RecordRepository + ?Sized> RecordsService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<Stats, ServiceError> {
        let res = async {
            let total_customers = self.repo.count_customers(&CustomerFilter::default()).await?;
            let total_service_providers =
                self.repo.count_service_providers(&ServiceProviderFilter::default()).await?;
            Ok::<_, ServiceError>(Stats { total_customers, total_service_providers })
        }
        .await;
        logged("stats", res)
    }

    #[instrument(skip(self), fields(page = req.page()))]
    pub async fn list_customers(
        &self,
        filter: CustomerFilter,
        req: PageRequest,
    ) -> Result<Page<Customer>, ServiceError> {
        let filter = filter.normalized();
        let source = CustomerListing { repo: self.repo.as_ref(), filter: &filter };
        logged("list_customers", paginate(&source, req, CUSTOMERS_MESSAGE).await)
    }

    #[instrument(skip(self))]
    pub async fn get_customer(&self, id: &str) -> Result<Customer, ServiceError> {
        let found = logged("get_customer", self.repo.get_customer(id).await)?;
        found.ok_or_else(|| ServiceError::not_found("Customer", id))
    }

    #[instrument(skip(self), fields(page = req.page()))]
    pub async fn list_service_providers(
        &self,
        filter: ServiceProviderFilter,
        req: PageRequest,
    ) -> Result<Page<ServiceProviderSummary>, ServiceError> {
        let filter = filter.normalized();
        let source = ServiceProviderListing { repo: self.repo.as_ref(), filter: &filter };
        logged("list_service_providers", paginate(&source, req, SERVICE_PROVIDERS_MESSAGE).await)
    }

    #[instrument(skip(self))]
    pub async fn get_service_provider(&self, id: &str) -> Result<ServiceProvider, ServiceError> {
        let found = logged("get_service_provider", self.repo.get_service_provider(id).await)?;
        found.ok_or_else(|| ServiceError::not_found("Service provider", id))
    }

    #[instrument(skip(self), fields(page = req.page()))]
    pub async fn list_chats(
        &self,
        filter: ChatFilter,
        req: PageRequest,
    ) -> Result<Page<ChatSummary>, ServiceError> {
        let filter = filter.normalized();
        let source = ChatListing { repo: self.repo.as_ref(), filter: &filter };
        logged("list_chats", paginate(&source, req, CHATS_MESSAGE).await)
    }

    #[instrument(skip(self))]
    pub async fn get_chat(&self, id: &str) -> Result<ChatDetail, ServiceError> {
        let found = logged("get_chat", self.repo.get_chat(id).await)?;
        found.ok_or_else(|| ServiceError::not_found("Chat", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::EMPTY_MESSAGE;
    use crate::records::domain::Sender;
    use crate::records::repository::mock::InMemoryRecordRepository;

    fn seeded_customers(n: usize) -> Arc<InMemoryRecordRepository> {
        let repo = Arc::new(InMemoryRecordRepository::new());
        for i in 0..n {
            let (name, email) = (format!("Customer {i:02}"), format!("c{i:02}@example.com"));
            repo.add_customer(&name, &email, "555-0100").unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn twenty_five_customers_page_ten_serves_last_five() {
        let svc = RecordsService::new(seeded_customers(25));
        let page =
            svc.list_customers(CustomerFilter::default(), PageRequest::new(10)).await.unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[0].name, "Customer 20");
        assert_eq!(page.items[4].name, "Customer 24");
        assert_eq!(page.message, CUSTOMERS_MESSAGE);
    }

    #[tokio::test]
    async fn customer_filter_narrows_count() {
        let svc = RecordsService::new(seeded_customers(25));
        let f = CustomerFilter::new(Some("customer 1".into()), None);
        let page = svc.list_customers(f, PageRequest::default()).await.unwrap();
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.iter().all(|c| c.name.starts_with("Customer 1")));
    }

    #[tokio::test]
    async fn no_matches_gives_empty_envelope() {
        let svc = RecordsService::new(seeded_customers(3));
        let f = CustomerFilter::new(None, Some("nobody".into()));
        let page = svc.list_customers(f, PageRequest::new(2)).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.current_page, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.message, EMPTY_MESSAGE);
    }

    #[tokio::test]
    async fn stats_counts_both_collections() {
        let repo = seeded_customers(4);
        repo.add_service_provider("P", "p@example.com", "1", "plumbing", vec![]).unwrap();
        let svc = RecordsService::new(repo);
        let stats = svc.stats().await.unwrap();
        assert_eq!(stats, Stats { total_customers: 4, total_service_providers: 1 });
    }

    #[tokio::test]
    async fn missing_ids_are_not_found_with_id_in_message() {
        let svc = RecordsService::new(seeded_customers(1));
        let err = svc.get_customer("64b7f0c2a1b2c3d4e5f60718").await.unwrap_err();
        assert!(
            matches!(&err, ServiceError::NotFound(m) if m.contains("64b7f0c2a1b2c3d4e5f60718"))
        );
        assert!(matches!(svc.get_service_provider("nope").await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.get_chat("nope").await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn chat_listing_filters_on_joined_customer() {
        let repo = Arc::new(InMemoryRecordRepository::new());
        let alice = repo.add_customer("Alice", "alice@example.com", "1").unwrap();
        let bob = repo.add_customer("Bob", "bob@example.org", "2").unwrap();
        let sp = repo
            .add_service_provider("Sparky", "sparky@example.com", "3", "Electrical", vec![])
            .unwrap();
        let messages = [(Sender::Customer, "hello"), (Sender::ServiceProvider, "hi")];
        repo.add_chat(&alice.id, &sp.id, &messages).unwrap();
        repo.add_chat(&bob.id, &sp.id, &[(Sender::Customer, "yo")]).unwrap();
        let svc = RecordsService::new(repo.clone());

        let f = ChatFilter::from_param(Some(r#"{"customer":{"email":"ALICE"}}"#)).unwrap();
        let page = svc.list_chats(f.clone(), PageRequest::default()).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].customer.id, alice.id);
        assert_eq!(page.items[0].message_count, 2);

        let (direct_total, _) = repo.chat_window(&f, 0, u64::MAX).await.unwrap();
        assert_eq!(direct_total, 1);

        let raw = r#"{"serviceProvider":{"serviceType":"electr"}}"#;
        let f = ChatFilter::from_param(Some(raw)).unwrap();
        let page = svc.list_chats(f, PageRequest::default()).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.message, CHATS_MESSAGE);
    }

    #[tokio::test]
    async fn chat_detail_resolves_references() {
        let repo = Arc::new(InMemoryRecordRepository::new());
        let c = repo.add_customer("Cara", "cara@example.com", "1").unwrap();
        let sp =
            repo.add_service_provider("Dan", "dan@example.com", "2", "Gardening", vec![]).unwrap();
        let messages = [(Sender::Customer, "first"), (Sender::ServiceProvider, "second")];
        let id = repo.add_chat(&c.id, &sp.id, &messages).unwrap();
        let svc = RecordsService::new(repo);

        let chat = svc.get_chat(&id).await.unwrap();
        assert_eq!(chat.customer.as_ref().map(|c| c.email.as_str()), Some("cara@example.com"));
        let service_type = chat.service_provider.as_ref().map(|p| p.service_type.as_str());
        assert_eq!(service_type, Some("Gardening"));
        let texts: Vec<_> = chat.messages.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, ["first", "second"]);
    }

    #[tokio::test]
    async fn storage_failures_surface_as_db_errors() {
        let repo = seeded_customers(2);
        repo.set_failure(Some("boom"));
        let svc = RecordsService::new(repo);
        assert!(matches!(svc.stats().await, Err(ServiceError::Db(_))));
        let listed = svc.list_customers(CustomerFilter::default(), PageRequest::default()).await;
        assert!(matches!(listed, Err(ServiceError::Db(_))));
    }
}
