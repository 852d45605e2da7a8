//! HTTP adapters - REST API implementation.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{ApiAppState, AuthenticatedUser, Role};
pub use routes::api_router;
