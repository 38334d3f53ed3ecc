use bson::oid::ObjectId;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

pub const COLLECTION: &str = "admins";

/// Admin login record; `password` holds a PHC hash string, never plain text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    pub password: String,
}

pub fn collection(db: &Database) -> Collection<Admin> {
    db.collection(COLLECTION)
}
