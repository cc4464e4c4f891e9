//! Item API handlers
//!
//! Every handler sits behind `require_auth`; `AuthUser` picks up the
//! context it stored rather than validating the token again.

use axum::{
    extract::{Path, State},
    Json,
};
use gearshare_auth::AuthUser;
use gearshare_common::{Error, RepositoryError, Result, ValidatedJson};
use serde::Serialize;

use crate::api::middleware::ItemsState;
use crate::domain::entities::{Item, ItemId, NewItem};

/// `{ "items": [...] }`
#[derive(Debug, Serialize)]
pub struct ItemListResponse {
    pub items: Vec<Item>,
}

/// `{ "item": {...} }`
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub item: Item,
}

/// `{ "id": "..." }`
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: ItemId,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: &'static str,
}

/// A path id that cannot name an item is reported the same way as an
/// absent one.
fn parse_item_id(raw: &str) -> Result<ItemId> {
    raw.parse()
        .map_err(|_| Error::NotFound(format!("Item {}", raw)))
}

/// List all items
pub async fn list_items(State(state): State<ItemsState>) -> Result<Json<ItemListResponse>> {
    let items = state.store.list().await?;
    Ok(Json(ItemListResponse { items }))
}

/// Create an item
///
/// Any failure to store the item is a 400, including storage faults.
pub async fn create_item(
    AuthUser(ctx): AuthUser,
    State(state): State<ItemsState>,
    ValidatedJson(fields): ValidatedJson<NewItem>,
) -> Result<Json<CreatedResponse>> {
    let id = state.store.create(fields).await.map_err(|e| match e {
        RepositoryError::InvalidData(msg) => Error::Validation(msg),
        RepositoryError::Connection(e) => {
            tracing::error!(error = %e, "Failed to store item");
            Error::Validation("Item could not be saved".to_string())
        }
    })?;

    tracing::info!(item_id = %id, sub = ?ctx.subject(), "Item created");
    Ok(Json(CreatedResponse { id }))
}

/// Get a single item by ID
pub async fn get_item(
    State(state): State<ItemsState>,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse>> {
    let id = parse_item_id(&id)?;
    let item = state
        .store
        .get(&id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Item {}", id)))?;

    Ok(Json(ItemResponse { item }))
}

/// Delete an item
pub async fn delete_item(
    AuthUser(ctx): AuthUser,
    State(state): State<ItemsState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_item_id(&id)?;
    if !state.store.delete(&id).await? {
        return Err(Error::NotFound(format!("Item {}", id)));
    }

    tracing::info!(item_id = %id, sub = ?ctx.subject(), "Item deleted");
    Ok(Json(MessageResponse {
        msg: "successfully deleted",
    }))
}

/// Fallback for unmatched `/api_v1` paths
pub async fn unknown_endpoint() -> Error {
    Error::NotFound("Unknown API endpoint".to_string())
}
