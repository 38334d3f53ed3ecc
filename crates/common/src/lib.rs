//! Shared building blocks for the admin panel crates: small response types
//! and the tracing bootstrap used by every binary.

pub mod types;
pub mod utils;
