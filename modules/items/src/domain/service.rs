use sea_orm::DatabaseConnection;
use store::{EntityStore, Page};
use uuid::Uuid;

use crate::contract::model::{Item, ItemPatch, NewItem};
use crate::domain::error::DomainError;
use crate::infra::storage::store::{ItemExtra, ItemStore, ItemUpdate};

pub const TITLE_MIN: usize = 1;
pub const TITLE_MAX: usize = 255;
pub const DESCRIPTION_MAX: usize = 255;

/// Item service. Ownership is assigned here and only here; the REST layer
/// decides who may see or touch which item.
pub struct Service {
    store: ItemStore,
}

impl Service {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            store: ItemStore::new(db),
        }
    }

    /// Create an item owned by `owner_id`. This is the sole path that
    /// assigns ownership; client input never carries an owner.
    pub async fn create_with_owner(
        &self,
        new_item: NewItem,
        owner_id: Uuid,
    ) -> Result<Item, DomainError> {
        validate_title(&new_item.title)?;
        validate_description(new_item.description.as_deref())?;

        tracing::debug!(%owner_id, "creating item");
        self.store
            .create(
                new_item,
                ItemExtra {
                    owner_id: Some(owner_id),
                },
            )
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Single lookup; the caller decides the not-found policy.
    pub async fn get_item(&self, id: Uuid) -> Result<Option<Item>, DomainError> {
        self.store
            .get(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Global pagination window plus the total count (superuser view).
    pub async fn list_items(&self, skip: u64, limit: u64) -> Result<Page<Item>, DomainError> {
        let data = self
            .store
            .list(skip, limit)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        let count = self
            .store
            .count()
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        Ok(Page { data, count })
    }

    /// Owner-scoped pagination window.
    pub async fn get_by_owner(
        &self,
        owner_id: Uuid,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Item>, DomainError> {
        self.store
            .find_by_owner(owner_id, skip, limit)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Owner's total count, independent of any pagination window.
    pub async fn count_by_owner(&self, owner_id: Uuid) -> Result<u64, DomainError> {
        self.store
            .count_by_owner(owner_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Owner-scoped pagination window plus the owner's total count.
    pub async fn list_by_owner(
        &self,
        owner_id: Uuid,
        skip: u64,
        limit: u64,
    ) -> Result<Page<Item>, DomainError> {
        let data = self.get_by_owner(owner_id, skip, limit).await?;
        let count = self.count_by_owner(owner_id).await?;
        Ok(Page { data, count })
    }

    /// Partial update. Ownership is immutable: the patch has no owner field
    /// and no extra fields are merged here.
    pub async fn update_item(&self, existing: &Item, patch: ItemPatch) -> Result<Item, DomainError> {
        if let Some(title) = patch.title.as_deref() {
            validate_title(title)?;
        }
        if let Some(description) = patch.description.as_ref() {
            validate_description(description.as_deref())?;
        }

        let update = ItemUpdate {
            title: patch.title,
            description: patch.description,
        };
        self.store
            .update(existing, update, ItemExtra::default())
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    pub async fn delete_item(&self, item: Item) -> Result<(), DomainError> {
        self.store
            .delete(item)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }
}

fn validate_title(title: &str) -> Result<(), DomainError> {
    let len = title.chars().count();
    if !(TITLE_MIN..=TITLE_MAX).contains(&len) {
        return Err(DomainError::title_length(len));
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<(), DomainError> {
    if let Some(text) = description {
        let len = text.chars().count();
        if len > DESCRIPTION_MAX {
            return Err(DomainError::description_too_long(len, DESCRIPTION_MAX));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_validation_bounds() {
        assert!(validate_title("x").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title(&"t".repeat(255)).is_ok());
        assert!(validate_title(&"t".repeat(256)).is_err());
    }

    #[test]
    fn description_validation_bounds() {
        assert!(validate_description(None).is_ok());
        assert!(validate_description(Some("")).is_ok());
        assert!(validate_description(Some(&"d".repeat(255))).is_ok());
        assert!(validate_description(Some(&"d".repeat(256))).is_err());
    }
}
