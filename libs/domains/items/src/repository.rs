use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ItemError, ItemResult};
use crate::models::{Item, ItemPatch, NewItem};

/// Repository trait for Item persistence
///
/// This trait defines the data access interface for items. All inputs are
/// the normalized payloads produced by validation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// List all items, newest first
    async fn list(&self) -> ItemResult<Vec<Item>>;

    /// Get an item by id
    async fn get_by_id(&self, id: i32) -> ItemResult<Option<Item>>;

    /// Find the id of the item with the given name (exact match)
    async fn find_id_by_name(&self, name: &str) -> ItemResult<Option<i32>>;

    /// Insert a new item; the store assigns id and created_at
    async fn create(&self, input: NewItem) -> ItemResult<Item>;

    /// Apply a partial update to an existing item
    async fn update(&self, id: i32, patch: ItemPatch) -> ItemResult<Item>;

    /// Delete an item by id; returns false when no row matched
    async fn delete(&self, id: i32) -> ItemResult<bool>;
}

/// In-memory implementation of ItemRepository (for development/testing)
#[derive(Debug, Default)]
pub struct InMemoryItemRepository {
    items: Arc<RwLock<HashMap<i32, Item>>>,
    next_id: AtomicI32,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn list(&self) -> ItemResult<Vec<Item>> {
        let items = self.items.read().await;

        let mut result: Vec<Item> = items.values().cloned().collect();
        // Newest first; id breaks ties for items created in the same instant
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(result)
    }

    async fn get_by_id(&self, id: i32) -> ItemResult<Option<Item>> {
        let items = self.items.read().await;
        Ok(items.get(&id).cloned())
    }

    async fn find_id_by_name(&self, name: &str) -> ItemResult<Option<i32>> {
        let items = self.items.read().await;
        Ok(items.values().find(|i| i.name == name).map(|i| i.id))
    }

    async fn create(&self, input: NewItem) -> ItemResult<Item> {
        let mut items = self.items.write().await;

        if items.values().any(|i| i.name == input.name) {
            return Err(ItemError::DuplicateName(input.name));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let item = Item {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            created_at: Utc::now(),
        };
        items.insert(id, item.clone());

        tracing::info!(item_id = id, "Created item");
        Ok(item)
    }

    async fn update(&self, id: i32, patch: ItemPatch) -> ItemResult<Item> {
        let mut items = self.items.write().await;

        if let Some(ref new_name) = patch.name {
            if items.values().any(|i| i.id != id && &i.name == new_name) {
                return Err(ItemError::DuplicateName(new_name.clone()));
            }
        }

        let item = items.get_mut(&id).ok_or(ItemError::NotFound(id))?;
        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(description) = patch.description {
            item.description = description;
        }
        item.price = patch.price;
        let updated = item.clone();

        tracing::info!(item_id = id, "Updated item");
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> ItemResult<bool> {
        let mut items = self.items.write().await;

        if items.remove(&id).is_some() {
            tracing::info!(item_id = id, "Deleted item");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
