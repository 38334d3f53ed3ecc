//! Service layer for the admin panel backend.
//! - `auth`: admin login, password hashing and bearer tokens.
//! - `records`: filtered, paginated reads over customers, service providers and chats.
//! - Storage sits behind repository traits so handlers can be tested without MongoDB.

pub mod errors;
pub mod pagination;
pub mod auth;
pub mod records;
