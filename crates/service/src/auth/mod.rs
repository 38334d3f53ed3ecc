//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Login, password hashing and bearer-token issue/verification live here so
//! the HTTP layer only has to map results onto responses.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod token;
pub mod repo;

pub use service::AuthService;
pub use token::TokenService;
