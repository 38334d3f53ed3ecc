//! [`PageSource`] adapters over [`RecordRepository`], one per listing.

use async_trait::async_trait;

use super::domain::{ChatSummary, Customer, ServiceProviderSummary};
use super::filter::{ChatFilter, CustomerFilter, ServiceProviderFilter};
use super::repository::RecordRepository;
use crate::errors::ServiceError;
use crate::pagination::PageSource;

pub struct CustomerListing<'a, R: ?Sized> {
    pub repo: &'a R,
    pub filter: &'a CustomerFilter,
}

#[async_trait]
impl<'a, R: RecordRepository + ?Sized> PageSource for CustomerListing<'a, R> {
    type Item = Customer;

    async fn window(&self, skip: u64, limit: u64) -> Result<(u64, Vec<Customer>), ServiceError> {
        let total = self.repo.count_customers(self.filter).await?;
        if skip >= total {
            return Ok((total, Vec::new()));
        }
        let items = self.repo.find_customers(self.filter, skip, limit).await?;
        Ok((total, items))
    }
}

pub struct ServiceProviderListing<'a, R: ?Sized> {
    pub repo: &'a R,
    pub filter: &'a ServiceProviderFilter,
}

#[async_trait]
impl<'a, R: RecordRepository + ?Sized> PageSource for ServiceProviderListing<'a, R> {
    type Item = ServiceProviderSummary;

    async fn window(
        &self,
        skip: u64,
        limit: u64,
    ) -> Result<(u64, Vec<ServiceProviderSummary>), ServiceError> {
        let total = self.repo.count_service_providers(self.filter).await?;
        if skip >= total {
            return Ok((total, Vec::new()));
        }
        let items = self.repo.find_service_providers(self.filter, skip, limit).await?;
        Ok((total, items))
    }
}

/// Chats come back counted and paged from one joined query.
pub struct ChatListing<'a, R: ?Sized> {
    pub repo: &'a R,
    pub filter: &'a ChatFilter,
}

#[async_trait]
impl<'a, R: RecordRepository + ?Sized> PageSource for ChatListing<'a, R> {
    type Item = ChatSummary;

    async fn window(&self, skip: u64, limit: u64) -> Result<(u64, Vec<ChatSummary>), ServiceError> {
        self.repo.chat_window(self.filter, skip, limit).await
    }
}
