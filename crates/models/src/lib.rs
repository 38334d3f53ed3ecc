//! Stored document shapes for the admin panel collections.
//!
//! Field names follow the camelCase layout already present in the database;
//! the service layer converts these into API views.

pub mod errors;
pub mod db;
pub mod admin;
pub mod customer;
pub mod service_provider;
pub mod chat_history;

/// Validate the minimal email shape accepted by the collections.
pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !trimmed.contains(char::is_whitespace) =>
        {
            Ok(())
        }
        _ => Err(errors::ModelError::Validation(format!("invalid email: {email}"))),
    }
}
