//! Read-only access to customers, service providers and chat histories.
//!
//! `repository` defines the storage seam (MongoDB in production, in-memory in
//! tests), `listing` adapts it to the shared pagination helper and `service`
//! is what the HTTP handlers call.

pub mod domain;
pub mod filter;
pub mod listing;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::RecordsService;

pub const CUSTOMERS_MESSAGE: &str = "Customers fetched successfully";
pub const SERVICE_PROVIDERS_MESSAGE: &str = "Service providers fetched successfully";
pub const CHATS_MESSAGE: &str = "Chats fetched successfully";
