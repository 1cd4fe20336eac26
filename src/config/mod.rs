//! Application configuration, loaded from environment variables.
//!
//! Each submodule owns one concern and exposes a `from_env()` constructor:
//!
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`jwt`]: token secret and expirations
//! - [`password`]: bcrypt cost factor
//! - [`posts`]: external posts feed source

pub mod database;
pub mod jwt;
pub mod password;
pub mod posts;
