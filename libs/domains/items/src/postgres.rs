use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
    TransactionTrait,
};

use crate::{
    entity,
    error::{ItemError, ItemResult},
    models::{Item, ItemPatch, NewItem},
    repository::ItemRepository,
};

/// PostgreSQL implementation of ItemRepository.
///
/// All statements are parameterized by SeaORM; client input never reaches
/// the SQL text. Connections are leased from the pool per operation and
/// returned on every exit path.
pub struct PgItemRepository {
    db: DatabaseConnection,
}

impl PgItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn list(&self) -> ItemResult<Vec<Item>> {
        let models = entity::Entity::find()
            .order_by_desc(entity::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: i32) -> ItemResult<Option<Item>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;

        Ok(model.map(Into::into))
    }

    async fn find_id_by_name(&self, name: &str) -> ItemResult<Option<i32>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Name.eq(name))
            .one(&self.db)
            .await?;

        Ok(model.map(|m| m.id))
    }

    async fn create(&self, input: NewItem) -> ItemResult<Item> {
        let name = input.name.clone();
        let active_model: entity::ActiveModel = input.into();

        // INSERT ... RETURNING: the generated id and created_at come back
        // from the insert itself, so a concurrent duplicate name can never
        // make us read someone else's row.
        let model = entity::Entity::insert(active_model)
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| match ItemError::from(e) {
                ItemError::DuplicateName(_) => ItemError::DuplicateName(name.clone()),
                other => other,
            })?;

        tracing::info!(item_id = model.id, "Created item");
        Ok(model.into())
    }

    async fn update(&self, id: i32, patch: ItemPatch) -> ItemResult<Item> {
        // Read and write share one transaction; any early return rolls it
        // back when the transaction handle is dropped.
        let txn = self.db.begin().await?;

        let model = entity::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ItemError::NotFound(id))?;

        // Allow-listed column setters; only supplied fields are touched.
        let mut active_model = model.into_active_model();
        if let Some(name) = patch.name.clone() {
            active_model.name = Set(name);
        }
        if let Some(description) = patch.description {
            active_model.description = Set(description);
        }
        active_model.price = Set(patch.price);

        let updated = entity::Entity::update(active_model)
            .exec(&txn)
            .await
            .map_err(|e| match (ItemError::from(e), patch.name) {
                (ItemError::DuplicateName(_), Some(name)) => ItemError::DuplicateName(name),
                (other, _) => other,
            })?;

        txn.commit().await?;

        tracing::info!(item_id = id, "Updated item");
        Ok(updated.into())
    }

    async fn delete(&self, id: i32) -> ItemResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(item_id = id, "Deleted item");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
