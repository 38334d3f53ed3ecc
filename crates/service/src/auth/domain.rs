use serde::{Deserialize, Serialize};

/// Login input. Missing fields arrive as empty strings and fail lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Input for seeding a new admin out-of-band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdminInput {
    pub email: String,
    pub password: String,
}

/// Stored admin credentials (hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub id: String,
    pub email: String,
    pub password_hash: String,
}

/// Identity carried by a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub id: String,
}

/// Login result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginOutput {
    pub token: String,
}
