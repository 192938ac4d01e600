//! Item Service - Business logic layer

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ItemError, ItemResult};
use crate::models::{CreateItem, Item, ItemResponse, UpdateItem};
use crate::repository::ItemRepository;
use crate::timefmt::RelativeTimeFormatter;

/// Item service providing business logic operations.
///
/// The service layer validates and normalizes payloads, enforces the name
/// uniqueness use cases, and decorates results with the relative creation
/// time.
pub struct ItemService<R: ItemRepository> {
    repository: Arc<R>,
    formatter: RelativeTimeFormatter,
}

impl<R: ItemRepository> ItemService<R> {
    /// Create a new ItemService with the default (English) time formatter
    pub fn new(repository: R) -> Self {
        Self::with_formatter(repository, RelativeTimeFormatter::default())
    }

    /// Create a new ItemService with an explicit time formatter
    pub fn with_formatter(repository: R, formatter: RelativeTimeFormatter) -> Self {
        Self {
            repository: Arc::new(repository),
            formatter,
        }
    }

    fn present(&self, item: Item, now: DateTime<Utc>) -> ItemResponse {
        let created_at_formatted = self.formatter.format(item.created_at, now);
        ItemResponse {
            item,
            created_at_formatted,
        }
    }

    /// List all items, newest first
    #[instrument(skip(self))]
    pub async fn list_items(&self) -> ItemResult<Vec<ItemResponse>> {
        let now = Utc::now();
        let items = self.repository.list().await?;
        Ok(items.into_iter().map(|i| self.present(i, now)).collect())
    }

    /// Get an item by id
    #[instrument(skip(self))]
    pub async fn get_item(&self, id: i32) -> ItemResult<ItemResponse> {
        let item = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(ItemError::NotFound(id))?;

        Ok(self.present(item, Utc::now()))
    }

    /// Create a new item
    #[instrument(skip(self, input), fields(item_name = %input.name))]
    pub async fn create_item(&self, input: CreateItem) -> ItemResult<ItemResponse> {
        input
            .validate()
            .map_err(|e| ItemError::Validation(e.to_string()))?;
        let input = input.into_new_item();

        // Early probe for a friendlier error; the unique index remains the
        // final arbiter under concurrent creates.
        if self.repository.find_id_by_name(&input.name).await?.is_some() {
            return Err(ItemError::DuplicateName(input.name));
        }

        let item = self.repository.create(input).await?;
        Ok(self.present(item, Utc::now()))
    }

    /// Apply a partial update to an existing item
    #[instrument(skip(self, input))]
    pub async fn update_item(&self, id: i32, input: UpdateItem) -> ItemResult<ItemResponse> {
        input
            .validate()
            .map_err(|e| ItemError::Validation(e.to_string()))?;
        let patch = input
            .into_patch()
            .ok_or_else(|| ItemError::Validation("price is required".to_string()))?;

        // The item must exist before any uniqueness probe or mutation
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ItemError::NotFound(id))?;

        // A renamed item may not take another item's name
        if let Some(ref new_name) = patch.name {
            if let Some(other_id) = self.repository.find_id_by_name(new_name).await? {
                if other_id != id {
                    return Err(ItemError::DuplicateName(new_name.clone()));
                }
            }
        }

        let item = self.repository.update(id, patch).await?;
        Ok(self.present(item, Utc::now()))
    }

    /// Delete an item by id
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: i32) -> ItemResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(ItemError::NotFound(id));
        }

        Ok(())
    }
}

impl<R: ItemRepository> Clone for ItemService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            formatter: self.formatter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewItem;
    use crate::repository::{InMemoryItemRepository, MockItemRepository};
    use crate::timefmt::Locale;
    use mockall::predicate::eq;

    fn create_input(name: &str, price: f64) -> CreateItem {
        CreateItem {
            name: name.to_string(),
            description: String::new(),
            price,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let service = ItemService::new(InMemoryItemRepository::new());

        let created = service
            .create_item(CreateItem {
                name: "Laptop".to_string(),
                description: "A fast one".to_string(),
                price: 999.99,
            })
            .await
            .unwrap();

        let fetched = service.get_item(created.item.id).await.unwrap();
        assert_eq!(fetched.item.name, "Laptop");
        assert_eq!(fetched.item.description, "A fast one");
        assert_eq!(fetched.item.price, 999.99);
        assert_eq!(fetched.created_at_formatted, "a few seconds ago");
    }

    #[tokio::test]
    async fn test_create_trims_name() {
        let service = ItemService::new(InMemoryItemRepository::new());

        let created = service.create_item(create_input("  Laptop  ", 10.0)).await.unwrap();
        assert_eq!(created.item.name, "Laptop");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_price() {
        let service = ItemService::new(InMemoryItemRepository::new());

        for price in [0.0, -1.0] {
            let result = service.create_item(create_input("Laptop", price)).await;
            assert!(matches!(result, Err(ItemError::Validation(_))), "price {}", price);
        }

        // Just above zero is fine
        assert!(service.create_item(create_input("Laptop", 0.01)).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_names() {
        let service = ItemService::new(InMemoryItemRepository::new());

        let result = service.create_item(create_input("   ", 1.0)).await;
        assert!(matches!(result, Err(ItemError::Validation(_))));

        let result = service
            .create_item(create_input(&"x".repeat(101), 1.0))
            .await;
        assert!(matches!(result, Err(ItemError::Validation(_))));

        // Exactly 100 characters is accepted
        assert!(service
            .create_item(create_input(&"x".repeat(100), 1.0))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_create_duplicate_name_conflict() {
        let service = ItemService::new(InMemoryItemRepository::new());

        service.create_item(create_input("Laptop", 10.0)).await.unwrap();
        let result = service.create_item(create_input("Laptop", 20.0)).await;
        assert!(matches!(result, Err(ItemError::DuplicateName(_))));

        // Same name after trimming is still a duplicate
        let result = service.create_item(create_input("  Laptop ", 20.0)).await;
        assert!(matches!(result, Err(ItemError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn test_update_requires_price() {
        let service = ItemService::new(InMemoryItemRepository::new());
        let created = service.create_item(create_input("Laptop", 10.0)).await.unwrap();

        // Current contract: updating only the description is rejected
        let result = service
            .update_item(
                created.item.id,
                UpdateItem {
                    description: Some("new description".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(ItemError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_partial_fields() {
        let service = ItemService::new(InMemoryItemRepository::new());
        let created = service
            .create_item(CreateItem {
                name: "Desk".to_string(),
                description: "Wooden desk".to_string(),
                price: 150.0,
            })
            .await
            .unwrap();

        let updated = service
            .update_item(
                created.item.id,
                UpdateItem {
                    price: Some(175.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.item.name, "Desk");
        assert_eq!(updated.item.description, "Wooden desk");
        assert_eq!(updated.item.price, 175.0);
    }

    #[tokio::test]
    async fn test_update_missing_item() {
        let service = ItemService::new(InMemoryItemRepository::new());

        let result = service
            .update_item(
                999,
                UpdateItem {
                    price: Some(1.0),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(ItemError::NotFound(999))));
    }

    #[tokio::test]
    async fn test_update_name_conflict_with_other_item() {
        let service = ItemService::new(InMemoryItemRepository::new());
        service.create_item(create_input("Desk", 1.0)).await.unwrap();
        let chair = service.create_item(create_input("Chair", 1.0)).await.unwrap();

        let result = service
            .update_item(
                chair.item.id,
                UpdateItem {
                    name: Some("Desk".to_string()),
                    price: Some(1.0),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(ItemError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn test_update_keeping_own_name_is_not_a_conflict() {
        let service = ItemService::new(InMemoryItemRepository::new());
        let desk = service.create_item(create_input("Desk", 1.0)).await.unwrap();

        let updated = service
            .update_item(
                desk.item.id,
                UpdateItem {
                    name: Some("Desk".to_string()),
                    price: Some(2.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.item.price, 2.0);
    }

    #[tokio::test]
    async fn test_delete_then_get_not_found() {
        let service = ItemService::new(InMemoryItemRepository::new());
        let created = service.create_item(create_input("Laptop", 10.0)).await.unwrap();

        service.delete_item(created.item.id).await.unwrap();

        let result = service.get_item(created.item.id).await;
        assert!(matches!(result, Err(ItemError::NotFound(_))));

        let result = service.delete_item(created.item.id).await;
        assert!(matches!(result, Err(ItemError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_formats_relative_time() {
        let service = ItemService::new(InMemoryItemRepository::new());
        service.create_item(create_input("Laptop", 10.0)).await.unwrap();

        let items = service.list_items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].created_at_formatted, "a few seconds ago");
    }

    #[tokio::test]
    async fn test_spanish_formatter_is_carried_through() {
        let service = ItemService::with_formatter(
            InMemoryItemRepository::new(),
            RelativeTimeFormatter::new(Locale::Es),
        );
        let created = service.create_item(create_input("Laptop", 10.0)).await.unwrap();
        assert_eq!(created.created_at_formatted, "Hace unos segundos");
    }

    #[tokio::test]
    async fn test_store_errors_pass_through() {
        let mut mock_repo = MockItemRepository::new();
        mock_repo
            .expect_list()
            .returning(|| Err(ItemError::Unavailable("connection refused".to_string())));

        let service = ItemService::new(mock_repo);
        let result = service.list_items().await;
        assert!(matches!(result, Err(ItemError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_create_does_not_reach_store_on_invalid_input() {
        // No expectations set: any repository call would panic the test
        let mock_repo = MockItemRepository::new();
        let service = ItemService::new(mock_repo);

        let result = service.create_item(create_input("", 1.0)).await;
        assert!(matches!(result, Err(ItemError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_checks_uniqueness_before_insert() {
        let mut mock_repo = MockItemRepository::new();
        mock_repo
            .expect_find_id_by_name()
            .with(eq("Laptop"))
            .returning(|_| Ok(Some(7)));

        let service = ItemService::new(mock_repo);
        let result = service.create_item(create_input("Laptop", 10.0)).await;
        assert!(matches!(result, Err(ItemError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn test_create_surfaces_store_level_conflict() {
        // The uniqueness probe saw nothing, but the insert lost the race
        let mut mock_repo = MockItemRepository::new();
        mock_repo
            .expect_find_id_by_name()
            .returning(|_| Ok(None));
        mock_repo
            .expect_create()
            .returning(|input: NewItem| Err(ItemError::DuplicateName(input.name)));

        let service = ItemService::new(mock_repo);
        let result = service.create_item(create_input("Laptop", 10.0)).await;
        assert!(matches!(result, Err(ItemError::DuplicateName(_))));
    }
}
