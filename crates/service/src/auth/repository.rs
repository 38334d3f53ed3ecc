use async_trait::async_trait;

use super::domain::AdminCredentials;
use super::errors::AuthError;

/// Repository abstraction for admin credential persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminCredentials>, AuthError>;
    async fn create_admin(
        &self,
        email: &str,
        password_hash: String,
    ) -> Result<AdminCredentials, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use bson::oid::ObjectId;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        admins: Mutex<HashMap<String, AdminCredentials>>, // key: email
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_admin_by_email(
            &self,
            email: &str,
        ) -> Result<Option<AdminCredentials>, AuthError> {
            let admins = self.admins.lock().map_err(|e| AuthError::Repository(e.to_string()))?;
            Ok(admins.get(email).cloned())
        }

        async fn create_admin(
            &self,
            email: &str,
            password_hash: String,
        ) -> Result<AdminCredentials, AuthError> {
            let mut admins = self.admins.lock().map_err(|e| AuthError::Repository(e.to_string()))?;
            if admins.contains_key(email) {
                return Err(AuthError::Conflict);
            }
            let admin = AdminCredentials {
                id: ObjectId::new().to_hex(),
                email: email.to_string(),
                password_hash,
            };
            admins.insert(email.to_string(), admin.clone());
            Ok(admin)
        }
    }
}
