use bson::{oid::ObjectId, DateTime};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

pub const COLLECTION: &str = "customers";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default = "DateTime::now")]
    pub registration_date: DateTime,
}

pub fn collection(db: &Database) -> Collection<Customer> {
    db.collection(COLLECTION)
}
