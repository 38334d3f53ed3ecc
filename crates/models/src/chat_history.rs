use bson::{oid::ObjectId, DateTime};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

pub const COLLECTION: &str = "chathistories";

/// Who wrote a chat message. Stored as `"customer"` / `"serviceProvider"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Sender {
    Customer,
    ServiceProvider,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistory {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub customer: ObjectId,
    pub service_provider: ObjectId,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default = "DateTime::now")]
    pub last_updated: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub sender: Sender,
    pub message: String,
    #[serde(default = "DateTime::now")]
    pub timestamp: DateTime,
}

pub fn collection(db: &Database) -> Collection<ChatHistory> {
    db.collection(COLLECTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_uses_stored_names() {
        let provider = bson::to_bson(&Sender::ServiceProvider).unwrap();
        assert_eq!(provider, bson::Bson::String("serviceProvider".into()));
        let customer = bson::to_bson(&Sender::Customer).unwrap();
        assert_eq!(customer, bson::Bson::String("customer".into()));
    }

    #[test]
    fn unknown_sender_is_rejected() {
        let doc = bson::doc! { "sender": "admin", "message": "hi" };
        assert!(bson::from_document::<ChatMessage>(doc).is_err());
    }
}
