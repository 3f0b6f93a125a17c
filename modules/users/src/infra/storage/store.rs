use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set,
};
use store::{EntityStore, StoreError};
use uuid::Uuid;

use crate::contract::model::{NewUser, User};
use crate::infra::storage::entity::{self, Column, Entity};
use crate::infra::storage::mapper::entity_to_contract;

/// Storage-level partial update: only what reaches a column. The plaintext
/// `password` from the API patch never appears here.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
    pub full_name: Option<Option<String>>,
}

/// Privileged fields merged at create/update time, outside the input schema.
#[derive(Debug, Clone, Default)]
pub struct UserExtra {
    pub hashed_password: Option<String>,
}

/// Entity-specific repository for users.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Exact-match email lookup.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let found = Entity::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(found.map(entity_to_contract))
    }
}

#[async_trait]
impl EntityStore for UserStore {
    type Entity = User;
    type Create = NewUser;
    type Update = UserUpdate;
    type Extra = UserExtra;

    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let found = Entity::find_by_id(id).one(&self.db).await?;
        Ok(found.map(entity_to_contract))
    }

    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<User>, StoreError> {
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

    async fn create(&self, input: NewUser, extra: UserExtra) -> Result<User, StoreError> {
        let active_model = entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email),
            // An empty hash can never verify, so a record created without
            // the extra field has no usable credential.
            hashed_password: Set(extra.hashed_password.unwrap_or_default()),
            is_active: Set(input.is_active),
            is_superuser: Set(input.is_superuser),
            full_name: Set(input.full_name),
        };
        let inserted = active_model.insert(&self.db).await?;
        Ok(entity_to_contract(inserted))
    }

    async fn update(
        &self,
        existing: &User,
        input: UserUpdate,
        extra: UserExtra,
    ) -> Result<User, StoreError> {
        // SeaORM rejects an UPDATE with no changed columns; an empty patch
        // with no extras leaves the record untouched by definition.
        if input.email.is_none()
            && input.is_active.is_none()
            && input.is_superuser.is_none()
            && input.full_name.is_none()
            && extra.hashed_password.is_none()
        {
            return Ok(existing.clone());
        }

        let mut active_model = entity::ActiveModel {
            id: Set(existing.id),
            ..Default::default()
        };

        if let Some(email) = input.email {
            active_model.email = Set(email);
        }
        if let Some(is_active) = input.is_active {
            active_model.is_active = Set(is_active);
        }
        if let Some(is_superuser) = input.is_superuser {
            active_model.is_superuser = Set(is_superuser);
        }
        if let Some(full_name) = input.full_name {
            active_model.full_name = Set(full_name);
        }
        // Extra fields last: they may override computed columns.
        if let Some(hashed_password) = extra.hashed_password {
            active_model.hashed_password = Set(hashed_password);
        }

        let updated = active_model.update(&self.db).await?;
        Ok(entity_to_contract(updated))
    }

    async fn delete(&self, existing: User) -> Result<(), StoreError> {
        Entity::delete_by_id(existing.id).exec(&self.db).await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
