//! In-memory item store
//!
//! Used when no database is configured and throughout the test suites.
//! Contents are lost on restart.

use gearshare_common::RepositoryError;
use tokio::sync::RwLock;

use super::{prepare_item, ItemStore};
use crate::domain::entities::{Item, ItemId, NewItem};

/// In-memory item store
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    items: RwLock<Vec<Item>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ItemStore for MemoryItemStore {
    async fn create(&self, fields: NewItem) -> Result<ItemId, RepositoryError> {
        let item = prepare_item(fields)?;
        let id = item.id;

        // Appended in creation order, so the vector stays sorted by created_at
        self.items.write().await.push(item);
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<Item>, RepositoryError> {
        Ok(self.items.read().await.clone())
    }

    async fn get(&self, id: &ItemId) -> Result<Option<Item>, RepositoryError> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| item.id == *id).cloned())
    }

    async fn delete(&self, id: &ItemId) -> Result<bool, RepositoryError> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| item.id != *id);
        Ok(items.len() < before)
    }
}
