use thiserror::Error;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid Email")]
    UnknownEmail,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("No token, authorization denied")]
    MissingToken,
    #[error("Not authorized, token failed")]
    TokenRejected(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("admin already exists")]
    Conflict,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::UnknownEmail => 1001,
            AuthError::InvalidCredentials => 1002,
            AuthError::MissingToken => 1003,
            AuthError::TokenRejected(_) => 1004,
            AuthError::Validation(_) => 1005,
            AuthError::Conflict => 1006,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
            AuthError::Repository(_) => 1200,
        }
    }

    /// Failures caused by the caller rather than by this process.
    pub fn is_client_error(&self) -> bool {
        self.code() < 1100
    }
}

impl From<mongodb::error::Error> for AuthError {
    fn from(err: mongodb::error::Error) -> Self { AuthError::Repository(err.to_string()) }
}
