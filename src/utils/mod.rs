//! Shared utilities.
//!
//! - [`errors`]: application error type and HTTP mapping
//! - [`jwt`]: JWT creation and verification
//! - [`password`]: password hashing and verification

pub mod errors;
pub mod jwt;
pub mod password;
