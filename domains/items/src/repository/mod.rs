//! Item store implementations
//!
//! `ItemStore` is the persistence seam for the Items domain. Handlers hold
//! an `Arc<dyn ItemStore>`; the binary picks Postgres or in-memory storage.

pub mod memory;
pub mod postgres;

use gearshare_common::{validation_message, RepositoryError};
use validator::Validate;

use crate::domain::entities::{Item, ItemId, NewItem};

pub use memory::MemoryItemStore;
pub use postgres::PgItemStore;

/// Durable collection of items
#[async_trait::async_trait]
pub trait ItemStore: Send + Sync {
    /// Validate and persist a new item, returning its assigned id.
    /// Nothing is stored when validation fails.
    async fn create(&self, fields: NewItem) -> Result<ItemId, RepositoryError>;

    /// All items, oldest first
    async fn list(&self) -> Result<Vec<Item>, RepositoryError>;

    /// `None` when no item has this id
    async fn get(&self, id: &ItemId) -> Result<Option<Item>, RepositoryError>;

    /// `false` when no item has this id
    async fn delete(&self, id: &ItemId) -> Result<bool, RepositoryError>;
}

/// Build a storable item, rejecting incomplete input
pub(crate) fn prepare_item(fields: NewItem) -> Result<Item, RepositoryError> {
    fields
        .validate()
        .map_err(|e| RepositoryError::InvalidData(validation_message(&e)))?;
    Ok(Item::new(fields))
}
