use crate::contract::model::Item;
use crate::infra::storage::entity::Model as ItemEntity;

/// Convert a database entity to a contract model.
pub fn entity_to_contract(entity: ItemEntity) -> Item {
    Item {
        id: entity.id,
        title: entity.title,
        description: entity.description,
        owner_id: entity.owner_id,
    }
}
