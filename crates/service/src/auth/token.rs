use chrono::Utc;
use configs::AuthSettings;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::domain::AdminIdentity;
use super::errors::AuthError;

const BEARER_PREFIX: &str = "Bearer ";

/// Claims embedded in every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 bearer tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(&settings.jwt_secret, settings.token_ttl_secs)
    }

    /// Sign a token for `admin_id` that expires after the configured TTL.
    pub fn issue(&self, admin_id: &str) -> Result<String, AuthError> {
        self.issue_at(admin_id, Utc::now().timestamp())
    }

    fn issue_at(&self, admin_id: &str, issued_at: i64) -> Result<String, AuthError> {
        let claims = Claims {
            id: admin_id.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(self.ttl_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Check signature and expiry, returning the embedded identity.
    pub fn verify(&self, token: &str) -> Result<AdminIdentity, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| AdminIdentity { id: data.claims.id })
            .map_err(|e| AuthError::TokenRejected(e.to_string()))
    }
}

/// Pull the token out of an `Authorization` header value. Anything other than
/// `Bearer <token>` counts as no token at all.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let rest = header.and_then(|h| h.strip_prefix(BEARER_PREFIX)).ok_or(AuthError::MissingToken)?;
    Ok(rest.split(' ').next().unwrap_or_default())
}
