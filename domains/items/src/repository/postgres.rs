//! PostgreSQL item store

use gearshare_common::RepositoryError;
use sqlx::PgPool;

use super::{prepare_item, ItemStore};
use crate::domain::entities::{Item, ItemId, NewItem};

/// All columns in the items table, used for SELECT and RETURNING clauses.
const ITEM_COLUMNS: &str = "id, name, owner, img, description, created_at";

#[derive(Clone)]
pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending schema migrations
    #[mutants::skip] // Requires a live database; covered by deployment, not unit tests
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }
}

#[async_trait::async_trait]
impl ItemStore for PgItemStore {
    async fn create(&self, fields: NewItem) -> Result<ItemId, RepositoryError> {
        let item = prepare_item(fields)?;

        let query = format!(
            "INSERT INTO items ({ITEM_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ITEM_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Item>(&query)
            .bind(item.id)
            .bind(&item.name)
            .bind(&item.owner)
            .bind(&item.img)
            .bind(&item.description)
            .bind(item.created_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created.id)
    }

    async fn list(&self) -> Result<Vec<Item>, RepositoryError> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY created_at, id");
        let items = sqlx::query_as::<_, Item>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    async fn get(&self, id: &ItemId) -> Result<Option<Item>, RepositoryError> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1");
        let item = sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    async fn delete(&self, id: &ItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
