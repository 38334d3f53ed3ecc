use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use rand::rngs::OsRng;
use tracing::{info, debug, instrument};

use super::domain::{AdminCredentials, AdminIdentity, CreateAdminInput, LoginInput, LoginOutput};
use super::errors::AuthError;
use super::repository::AuthRepository;
use super::token::TokenService;

const MIN_PASSWORD_LEN: usize = 8;

/// Auth service configuration
#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    /// Report unknown emails with the same message as wrong passwords.
    pub uniform_login_errors: bool,
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository + ?Sized> {
    repo: Arc<R>,
    tokens: TokenService,
    cfg: AuthConfig,
}

/// Hash a password into an argon2 PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::HashError(e.to_string()))
}

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// Compare a password with a stored hash: an argon2 PHC string, or a bcrypt
/// hash for admins seeded before argon2 was used.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    if BCRYPT_PREFIXES.iter().any(|p| stored_hash.starts_with(p)) {
        return bcrypt::verify(password, stored_hash)
            .map_err(|e| AuthError::HashError(e.to_string()));
    }
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

impl<R: AuthRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, tokens: TokenService, cfg: AuthConfig) -> Self {
        Self { repo, tokens, cfg }
    }

    /// Seed a new admin with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::repository::mock::MockAuthRepository;
    /// use service::auth::service::{AuthConfig, AuthService};
    /// use service::auth::TokenService;
    /// use service::auth::domain::CreateAdminInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, TokenService::new("secret", 3600), AuthConfig::default());
    /// let input =
    ///     CreateAdminInput { email: "admin@example.com".into(), password: "Secret123".into() };
    /// let admin = tokio_test::block_on(svc.create_admin(input)).unwrap();
    /// assert_eq!(admin.email, "admin@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_admin(
        &self,
        input: CreateAdminInput,
    ) -> Result<AdminCredentials, AuthError> {
        models::validate_email(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
        }
        if let Some(existing) = self.repo.find_admin_by_email(&input.email).await? {
            debug!("admin exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let hash = hash_password(&input.password)?;
        let admin = self.repo.create_admin(&input.email, hash).await?;
        info!(admin_id = %admin.id, email = %admin.email, "admin_created");
        Ok(admin)
    }

    /// Authenticate an admin and issue a bearer token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::repository::mock::MockAuthRepository;
    /// use service::auth::service::{AuthConfig, AuthService};
    /// use service::auth::TokenService;
    /// use service::auth::domain::{CreateAdminInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, TokenService::new("secret", 3600), AuthConfig::default());
    /// let seed = CreateAdminInput { email: "a@e.com".into(), password: "Passw0rd".into() };
    /// tokio_test::block_on(svc.create_admin(seed)).unwrap();
    /// let input = LoginInput { email: "a@e.com".into(), password: "Passw0rd".into() };
    /// let out = tokio_test::block_on(svc.login(input)).unwrap();
    /// assert!(!out.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<LoginOutput, AuthError> {
        let unknown = if self.cfg.uniform_login_errors {
            AuthError::InvalidCredentials
        } else {
            AuthError::UnknownEmail
        };
        let admin = self.repo
            .find_admin_by_email(&input.email)
            .await?
            .ok_or(unknown)?;

        if !verify_password(&input.password, &admin.password_hash)? {
            debug!(admin_id = %admin.id, "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&admin.id)?;
        info!(admin_id = %admin.id, "admin_logged_in");
        Ok(LoginOutput { token })
    }

    /// Verify a bearer token issued by [`AuthService::login`].
    pub fn verify_token(&self, token: &str) -> Result<AdminIdentity, AuthError> {
        self.tokens.verify(token)
    }
}
