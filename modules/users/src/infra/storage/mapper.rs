use crate::contract::model::User;
use crate::infra::storage::entity::Model as UserEntity;

/// Convert a database entity to a contract model.
pub fn entity_to_contract(entity: UserEntity) -> User {
    User {
        id: entity.id,
        email: entity.email,
        is_active: entity.is_active,
        is_superuser: entity.is_superuser,
        full_name: entity.full_name,
        hashed_password: entity.hashed_password,
    }
}
