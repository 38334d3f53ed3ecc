use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound(format!("{entity} with id {id} not found"))
    }

    pub fn db(err: impl std::fmt::Display) -> Self { Self::Db(err.to_string()) }
}

impl From<mongodb::error::Error> for ServiceError {
    fn from(err: mongodb::error::Error) -> Self { Self::db(err) }
}

impl From<bson::de::Error> for ServiceError {
    fn from(err: bson::de::Error) -> Self { Self::db(err) }
}
