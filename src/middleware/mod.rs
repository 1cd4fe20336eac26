//! Request-processing middleware and extractors.
//!
//! [`auth`] provides the `AuthUser` extractor that authenticates a request,
//! transparently rotating an expired access token against the stored refresh
//! token before rejecting.

pub mod auth;
