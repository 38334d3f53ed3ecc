use async_trait::async_trait;
use bson::{doc, oid::ObjectId, DateTime, Document};
use futures::TryStreamExt;
use mongodb::Database;
use serde::Deserialize;
use tracing::debug;

use models::{chat_history, customer, service_provider};

use crate::errors::ServiceError;
use crate::records::domain::{
    ChatDetail, ChatSummary, Customer, CustomerRef, ServiceProvider, ServiceProviderRef,
    ServiceProviderSummary,
};
use crate::records::filter::{ChatFilter, CustomerFilter, ServiceProviderFilter};
use crate::records::repository::RecordRepository;

pub struct MongoRecordRepository {
    pub db: Database,
}

impl MongoRecordRepository {
    pub fn new(db: Database) -> Self { Self { db } }
}

/// Case-insensitive "contains" on the literal text of `value`.
fn regex_clause(value: &str) -> Document {
    doc! { "$regex": regex::escape(value), "$options": "i" }
}

fn push_clause(query: &mut Document, prefix: &str, field: &str, value: &Option<String>) {
    if let Some(v) = value {
        query.insert(format!("{prefix}{field}"), regex_clause(v));
    }
}

fn customer_query(filter: &CustomerFilter, prefix: &str) -> Document {
    let mut query = Document::new();
    push_clause(&mut query, prefix, "name", &filter.name);
    push_clause(&mut query, prefix, "email", &filter.email);
    query
}

fn service_provider_query(filter: &ServiceProviderFilter, prefix: &str) -> Document {
    let mut query = Document::new();
    push_clause(&mut query, prefix, "name", &filter.name);
    push_clause(&mut query, prefix, "email", &filter.email);
    push_clause(&mut query, prefix, "serviceType", &filter.service_type);
    query
}

fn chat_query(filter: &ChatFilter) -> Document {
    let mut query = customer_query(&filter.customer, "customer.");
    query.extend(service_provider_query(&filter.service_provider, "serviceProvider."));
    query
}

/// Ids that are not valid object ids cannot match anything.
fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

fn as_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Aggregation that joins, filters and pages chats, returning one
/// `{ metadata: [{ total }], data: [...] }` document.
fn chat_pipeline(filter: &ChatFilter, skip: u64, limit: u64) -> Vec<Document> {
    vec![
        doc! { "$lookup": {
            "from": customer::COLLECTION,
            "localField": "customer",
            "foreignField": "_id",
            "as": "customer",
        } },
        doc! { "$unwind": "$customer" },
        doc! { "$lookup": {
            "from": service_provider::COLLECTION,
            "localField": "serviceProvider",
            "foreignField": "_id",
            "as": "serviceProvider",
        } },
        doc! { "$unwind": "$serviceProvider" },
        doc! { "$match": chat_query(filter) },
        doc! { "$sort": { "_id": 1 } },
        doc! { "$facet": {
            "metadata": [ { "$count": "total" } ],
            "data": [
                { "$skip": as_i64(skip) },
                { "$limit": as_i64(limit) },
                { "$project": {
                    "customer": {
                        "_id": "$customer._id",
                        "name": "$customer.name",
                        "email": "$customer.email",
                    },
                    "serviceProvider": {
                        "_id": "$serviceProvider._id",
                        "name": "$serviceProvider.name",
                        "email": "$serviceProvider.email",
                        "serviceType": "$serviceProvider.serviceType",
                    },
                    "messageCount": { "$size": { "$ifNull": ["$messages", []] } },
                    "lastUpdated": 1,
                } },
            ],
        } },
    ]
}

#[derive(Deserialize)]
struct FacetRow {
    #[serde(default)]
    metadata: Vec<CountRow>,
    #[serde(default)]
    data: Vec<ChatRow>,
}

#[derive(Deserialize)]
struct CountRow {
    total: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatRow {
    #[serde(rename = "_id")]
    id: ObjectId,
    customer: CustomerRefRow,
    service_provider: ServiceProviderRefRow,
    message_count: i64,
    #[serde(default = "DateTime::now")]
    last_updated: DateTime,
}

#[derive(Deserialize)]
struct CustomerRefRow {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceProviderRefRow {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    service_type: String,
}

impl From<ChatRow> for ChatSummary {
    fn from(r: ChatRow) -> Self {
        Self {
            id: r.id.to_hex(),
            customer: CustomerRef {
                id: r.customer.id.to_hex(),
                name: r.customer.name,
                email: r.customer.email,
            },
            service_provider: ServiceProviderRef {
                id: r.service_provider.id.to_hex(),
                name: r.service_provider.name,
                email: r.service_provider.email,
                service_type: r.service_provider.service_type,
            },
            message_count: u64::try_from(r.message_count).unwrap_or(0),
            last_updated: r.last_updated.to_chrono(),
        }
    }
}

#[async_trait]
impl RecordRepository for MongoRecordRepository {
    async fn count_customers(&self, filter: &CustomerFilter) -> Result<u64, ServiceError> {
        Ok(customer::collection(&self.db).count_documents(customer_query(filter, "")).await?)
    }

    async fn find_customers(
        &self,
        filter: &CustomerFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Customer>, ServiceError> {
        let cursor = customer::collection(&self.db)
            .find(customer_query(filter, ""))
            .sort(doc! { "_id": 1 })
            .skip(skip)
            .limit(as_i64(limit))
            .projection(doc! { "name": 1, "email": 1, "phone": 1, "registrationDate": 1 })
            .await?;
        let rows: Vec<customer::Customer> = cursor.try_collect().await?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn get_customer(&self, id: &str) -> Result<Option<Customer>, ServiceError> {
        let Some(oid) = parse_id(id) else { return Ok(None) };
        let found = customer::collection(&self.db).find_one(doc! { "_id": oid }).await?;
        Ok(found.map(Customer::from))
    }

    async fn count_service_providers(
        &self,
        filter: &ServiceProviderFilter,
    ) -> Result<u64, ServiceError> {
        let query = service_provider_query(filter, "");
        Ok(service_provider::collection(&self.db).count_documents(query).await?)
    }

    async fn find_service_providers(
        &self,
        filter: &ServiceProviderFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<ServiceProviderSummary>, ServiceError> {
        let cursor = service_provider::collection(&self.db)
            .find(service_provider_query(filter, ""))
            .sort(doc! { "_id": 1 })
            .skip(skip)
            .limit(as_i64(limit))
            .projection(doc! { "reviews": 0 })
            .await?;
        let rows: Vec<service_provider::ServiceProvider> = cursor.try_collect().await?;
        Ok(rows.into_iter().map(|sp| ServiceProvider::from(sp).summary()).collect())
    }

    async fn get_service_provider(
        &self,
        id: &str,
    ) -> Result<Option<ServiceProvider>, ServiceError> {
        let Some(oid) = parse_id(id) else { return Ok(None) };
        let found = service_provider::collection(&self.db).find_one(doc! { "_id": oid }).await?;
        Ok(found.map(ServiceProvider::from))
    }

    async fn chat_window(
        &self,
        filter: &ChatFilter,
        skip: u64,
        limit: u64,
    ) -> Result<(u64, Vec<ChatSummary>), ServiceError> {
        let pipeline = chat_pipeline(filter, skip, limit);
        debug!(stages = pipeline.len(), "chat aggregation");
        let mut cursor = chat_history::collection(&self.db).aggregate(pipeline).await?;
        let Some(raw) = cursor.try_next().await? else { return Ok((0, Vec::new())) };
        let row: FacetRow = bson::from_document(raw)?;
        let total = row.metadata.first().map(|m| u64::try_from(m.total).unwrap_or(0)).unwrap_or(0);
        Ok((total, row.data.into_iter().map(ChatSummary::from).collect()))
    }

    async fn get_chat(&self, id: &str) -> Result<Option<ChatDetail>, ServiceError> {
        let Some(oid) = parse_id(id) else { return Ok(None) };
        let chats = chat_history::collection(&self.db);
        let Some(chat) = chats.find_one(doc! { "_id": oid }).await? else {
            return Ok(None);
        };
        let customer =
            customer::collection(&self.db).find_one(doc! { "_id": chat.customer }).await?;
        let provider = service_provider::collection(&self.db)
            .find_one(doc! { "_id": chat.service_provider })
            .await?;
        Ok(Some(ChatDetail {
            id: chat.id.to_hex(),
            customer: customer.map(Customer::from),
            service_provider: provider.map(ServiceProvider::from),
            messages: chat.messages.into_iter().map(Into::into).collect(),
            last_updated: chat.last_updated.to_chrono(),
        }))
    }
}
