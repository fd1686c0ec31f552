//! Auth module: three-layer architecture (domain, repository, service).
//!
//! This module centralizes registration, login and token handling under
//! the service crate.

pub mod domain;
pub mod errors;
pub mod repo;
pub mod repository;
pub mod service;
pub mod token;

pub use service::AuthService;
