use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Custom validator for item names: non-empty and at most 100 characters
/// after trimming surrounding whitespace.
fn validate_item_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("item_name");
        err.message = Some("name must not be empty".into());
        return Err(err);
    }
    if trimmed.chars().count() > 100 {
        let mut err = ValidationError::new("item_name");
        err.message = Some("name must not exceed 100 characters".into());
        return Err(err);
    }
    Ok(())
}

/// Custom validator for prices: a finite number strictly greater than zero.
fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() || price <= 0.0 {
        let mut err = ValidationError::new("item_price");
        err.message = Some("price must be greater than zero".into());
        return Err(err);
    }
    Ok(())
}

/// Every update must re-state the price, even when only other fields change.
fn validate_update_has_price(update: &UpdateItem) -> Result<(), ValidationError> {
    if update.price.is_none() {
        let mut err = ValidationError::new("item_price");
        err.message = Some("price is required".into());
        return Err(err);
    }
    Ok(())
}

/// Item entity - the persisted resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Unique identifier, assigned by the database
    pub id: i32,
    /// Item name (unique across all items)
    pub name: String,
    /// Item description
    pub description: String,
    /// Item price (always > 0)
    pub price: f64,
    /// Creation timestamp, assigned by the database
    pub created_at: DateTime<Utc>,
}

/// Wire representation of an item: the entity plus a human-readable
/// elapsed-time rendering of `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemResponse {
    #[serde(flatten)]
    pub item: Item,
    /// Relative creation time, e.g. "2 hours ago"
    pub created_at_formatted: String,
}

/// DTO for creating a new item
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateItem {
    #[validate(custom(function = "validate_item_name"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "validate_price"))]
    pub price: f64,
}

/// DTO for updating an existing item.
///
/// Any subset of fields may be supplied, except that `price` must always be
/// present - the update contract re-validates it on every request.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_update_has_price"))]
pub struct UpdateItem {
    #[validate(custom(function = "validate_item_name"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Option<f64>,
}

/// Confirmation payload returned by the delete endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteConfirmation {
    pub message: String,
}

/// Normalized create payload, ready for persistence
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub price: f64,
}

/// Normalized update payload, ready for persistence.
///
/// Only `Some` fields are applied; `price` is always applied because the
/// update contract requires it.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: f64,
}

impl CreateItem {
    /// Normalize a validated create payload: the name is trimmed.
    pub fn into_new_item(self) -> NewItem {
        NewItem {
            name: self.name.trim().to_string(),
            description: self.description,
            price: self.price,
        }
    }
}

impl UpdateItem {
    /// Normalize a validated update payload: the name is trimmed.
    ///
    /// Returns `None` when `price` is absent (the payload failed validation).
    pub fn into_patch(self) -> Option<ItemPatch> {
        Some(ItemPatch {
            name: self.name.map(|n| n.trim().to_string()),
            description: self.description,
            price: self.price?,
        })
    }
}
