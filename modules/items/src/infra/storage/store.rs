use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set,
};
use store::{EntityStore, StoreError};
use uuid::Uuid;

use crate::contract::model::{Item, NewItem};
use crate::infra::storage::entity::{self, Column, Entity};
use crate::infra::storage::mapper::entity_to_contract;

/// Storage-level partial update. Ownership is not updatable.
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
}

/// Privileged fields merged at create time, outside the input schema. The
/// owner comes from the authenticated actor, never from the client payload.
#[derive(Debug, Clone, Default)]
pub struct ItemExtra {
    pub owner_id: Option<Uuid>,
}

/// Entity-specific repository for items.
pub struct ItemStore {
    db: DatabaseConnection,
}

impl ItemStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Owner-scoped pagination window.
    pub async fn find_by_owner(
        &self,
        owner_id: Uuid,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Item>, StoreError> {
        let rows = Entity::find()
            .filter(Column::OwnerId.eq(owner_id))
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(entity_to_contract).collect())
    }

    pub async fn count_by_owner(&self, owner_id: Uuid) -> Result<u64, StoreError> {
        Ok(Entity::find()
            .filter(Column::OwnerId.eq(owner_id))
            .count(&self.db)
            .await?)
    }
}

#[async_trait]
impl EntityStore for ItemStore {
    type Entity = Item;
    type Create = NewItem;
    type Update = ItemUpdate;
    type Extra = ItemExtra;

    async fn get(&self, id: Uuid) -> Result<Option<Item>, StoreError> {
        let found = Entity::find_by_id(id).one(&self.db).await?;
        Ok(found.map(entity_to_contract))
    }

    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Item>, StoreError> {
        let rows = Entity::find()
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(entity_to_contract).collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(Entity::find().count(&self.db).await?)
    }

    async fn create(&self, input: NewItem, extra: ItemExtra) -> Result<Item, StoreError> {
        let active_model = entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(input.title),
            description: Set(input.description),
            // A missing owner is the nil uuid, which fails the FK at insert.
            owner_id: Set(extra.owner_id.unwrap_or_default()),
        };
        let inserted = active_model.insert(&self.db).await?;
        Ok(entity_to_contract(inserted))
    }

    async fn update(
        &self,
        existing: &Item,
        input: ItemUpdate,
        _extra: ItemExtra,
    ) -> Result<Item, StoreError> {
        // SeaORM rejects an UPDATE with no changed columns; an empty patch
        // leaves the record untouched by definition.
        if input.title.is_none() && input.description.is_none() {
            return Ok(existing.clone());
        }

        let mut active_model = entity::ActiveModel {
            id: Set(existing.id),
            ..Default::default()
        };

        if let Some(title) = input.title {
            active_model.title = Set(title);
        }
        if let Some(description) = input.description {
            active_model.description = Set(description);
        }

        let updated = active_model.update(&self.db).await?;
        Ok(entity_to_contract(updated))
    }

    async fn delete(&self, existing: Item) -> Result<(), StoreError> {
        Entity::delete_by_id(existing.id).exec(&self.db).await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
