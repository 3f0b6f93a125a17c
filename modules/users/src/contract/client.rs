use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::error::UsersError;
use crate::contract::model::{NewUser, User, UserPatch};

/// Public API trait for the users module that other components (auth
/// middleware, server wiring) consume.
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// Get a user by ID; a miss is `Ok(None)`.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, UsersError>;

    /// Create a new user from validated input (password is hashed inside).
    async fn create_user(&self, new_user: NewUser) -> Result<User, UsersError>;

    /// Apply a partial update to the user with the given id.
    async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<User, UsersError>;

    /// Delete a user by ID; `false` when nothing matched.
    async fn delete_user(&self, id: Uuid) -> Result<bool, UsersError>;

    /// Credential check; absent for unknown email and for a wrong password,
    /// indistinguishably.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, UsersError>;
}
