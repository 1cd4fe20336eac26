//! Feature modules. Each follows the same layout: `router.rs` wires routes,
//! `controller.rs` holds the HTTP handlers, `service.rs` the business logic
//! and `model.rs` the entities and DTOs.

pub mod auth;
pub mod posts;
pub mod users;
