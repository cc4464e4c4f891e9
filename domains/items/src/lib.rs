//! Items domain: shared gear entries, the item store, and the item API

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Item, ItemId, NewItem};

// Re-export repository types
pub use repository::{ItemStore, MemoryItemStore, PgItemStore};

// Re-export API types
pub use api::ItemsState;
pub use api::{api_prefix_router, api_router, routes, API_PREFIX};
