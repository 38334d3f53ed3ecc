use bson::{oid::ObjectId, DateTime};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const COLLECTION: &str = "serviceproviders";

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProvider {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service_type: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default = "DateTime::now")]
    pub registration_date: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub customer: Option<ObjectId>,
    pub rating: f64,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default = "DateTime::now")]
    pub review_date: DateTime,
}

/// Reviews are scored on a closed 1..=5 scale.
pub fn validate_rating(rating: f64) -> Result<(), ModelError> {
    if rating.is_finite() && (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(ModelError::Validation(format!(
            "review rating {rating} outside {MIN_RATING}..={MAX_RATING}"
        )))
    }
}

pub fn collection(db: &Database) -> Collection<ServiceProvider> {
    db.collection(COLLECTION)
}
