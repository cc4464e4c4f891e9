//! Domain entities for the Items domain
//!
//! An item is a piece of gear someone has put up for sharing. Items are
//! created and deleted, never updated in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Store-assigned item identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Item entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub owner: String,
    pub img: String,
    pub description: String,
    /// Insertion time, used only to keep listings in a stable order
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Assign an identifier to validated input
    pub fn new(fields: NewItem) -> Self {
        Self {
            id: ItemId::new(),
            name: fields.name,
            owner: fields.owner,
            img: fields.img,
            description: fields.description,
            created_at: Utc::now(),
        }
    }
}

/// Fields supplied when creating an item. All four are required and must
/// contain something other than whitespace. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewItem {
    #[validate(custom(function = "not_blank", message = "name is required"))]
    pub name: String,

    #[validate(custom(function = "not_blank", message = "owner is required"))]
    pub owner: String,

    #[validate(custom(function = "not_blank", message = "img is required"))]
    pub img: String,

    #[validate(custom(function = "not_blank", message = "description is required"))]
    pub description: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
