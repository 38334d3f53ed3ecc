use bson::{doc, oid::ObjectId};
use mongodb::{error::ErrorKind, Database};

use crate::auth::domain::AdminCredentials;
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

use models::admin::{self, Admin};

pub struct MongoAuthRepository {
    pub db: Database,
}

fn to_credentials(a: Admin) -> AdminCredentials {
    AdminCredentials { id: a.id.to_hex(), email: a.email, password_hash: a.password }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(mongodb::error::WriteFailure::WriteError(we)) => we.code == 11000,
        _ => false,
    }
}

#[async_trait::async_trait]
impl AuthRepository for MongoAuthRepository {
    async fn find_admin_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AdminCredentials>, AuthError> {
        let found = admin::collection(&self.db).find_one(doc! { "email": email }).await?;
        Ok(found.map(to_credentials))
    }

    async fn create_admin(
        &self,
        email: &str,
        password_hash: String,
    ) -> Result<AdminCredentials, AuthError> {
        let record =
            Admin { id: ObjectId::new(), email: email.to_string(), password: password_hash };
        match admin::collection(&self.db).insert_one(&record).await {
            Ok(_) => Ok(to_credentials(record)),
            Err(e) if is_duplicate_key(&e) => Err(AuthError::Conflict),
            Err(e) => Err(e.into()),
        }
    }
}
