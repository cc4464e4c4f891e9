//! API layer for the Items domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::ItemsState;
pub use routes::{api_prefix_router, api_router, routes, API_PREFIX};
