use std::sync::Arc;

use api_core::CredentialHasher;
use sea_orm::DatabaseConnection;
use store::{EntityStore, Page, StoreError};
use uuid::Uuid;

use crate::contract::model::{NewUser, User, UserPatch};
use crate::domain::error::DomainError;
use crate::infra::storage::store::{UserExtra, UserStore, UserUpdate};

pub const EMAIL_MAX: usize = 255;
pub const FULL_NAME_MAX: usize = 255;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 128;

/// User directory service: the only component that touches plaintext
/// passwords, and only long enough to hash or verify them.
pub struct Service {
    store: UserStore,
    hasher: Arc<dyn CredentialHasher>,
}

impl Service {
    pub fn new(db: DatabaseConnection, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            store: UserStore::new(db),
            hasher,
        }
    }

    /// Create a user: validate, hash the password, persist only the hash.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        validate_email(&new_user.email)?;
        validate_password(&new_user.password)?;
        validate_full_name(new_user.full_name.as_deref())?;

        let hashed = self
            .hasher
            .hash(&new_user.password)
            .map_err(|_| DomainError::Credential)?;
        let email = new_user.email.clone();

        tracing::debug!(%email, "creating user");
        self.store
            .create(
                new_user,
                UserExtra {
                    hashed_password: Some(hashed),
                },
            )
            .await
            .map_err(|e| map_store_error(e, &email))
    }

    /// Partial update. A `password` in the patch is re-hashed and applied as
    /// an extra field; the plaintext itself is never handed to the store.
    pub async fn update_user(&self, existing: &User, patch: UserPatch) -> Result<User, DomainError> {
        if let Some(email) = patch.email.as_deref() {
            validate_email(email)?;
        }
        if let Some(name) = patch.full_name.as_ref() {
            validate_full_name(name.as_deref())?;
        }

        let mut extra = UserExtra::default();
        if let Some(password) = patch.password.as_deref() {
            validate_password(password)?;
            extra.hashed_password =
                Some(self.hasher.hash(password).map_err(|_| DomainError::Credential)?);
        }

        let email_for_conflict = patch.email.clone().unwrap_or_else(|| existing.email.clone());
        let update = UserUpdate {
            email: patch.email,
            is_active: patch.is_active,
            is_superuser: patch.is_superuser,
            full_name: patch.full_name,
        };

        self.store
            .update(existing, update, extra)
            .await
            .map_err(|e| map_store_error(e, &email_for_conflict))
    }

    /// Single lookup; the caller decides the not-found policy.
    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.store
            .get(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Global pagination window plus the total count.
    pub async fn list_users(&self, skip: u64, limit: u64) -> Result<Page<User>, DomainError> {
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

    /// Delete by id; `false` when nothing matched. Owned items go with the
    /// user via the store-level cascade.
    pub async fn delete_user(&self, id: Uuid) -> Result<bool, DomainError> {
        self.store
            .delete_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Exact-match email lookup.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.store
            .find_by_email(email)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Credential check. Unknown email and wrong password both come back as
    /// `None`; callers must not be able to tell the cases apart.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let Some(user) = self.get_by_email(email).await? else {
            return Ok(None);
        };
        if !self.hasher.verify(password, &user.hashed_password) {
            return Ok(None);
        }
        Ok(Some(user))
    }

    /// Verify a plaintext against the user's stored hash (change-password flow).
    pub fn verify_password(&self, plaintext: &str, user: &User) -> bool {
        self.hasher.verify(plaintext, &user.hashed_password)
    }
}

fn map_store_error(err: StoreError, email: &str) -> DomainError {
    match err {
        StoreError::Conflict(_) => DomainError::email_already_exists(email),
        StoreError::Database(e) => DomainError::database(e.to_string()),
    }
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.len() > EMAIL_MAX {
        return Err(DomainError::invalid_email(email));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(DomainError::invalid_email(email)),
    }
}

fn validate_password(password: &str) -> Result<(), DomainError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        return Err(DomainError::password_length(len));
    }
    Ok(())
}

fn validate_full_name(full_name: Option<&str>) -> Result<(), DomainError> {
    if let Some(name) = full_name {
        if name.chars().count() > FULL_NAME_MAX {
            return Err(DomainError::full_name_too_long(
                name.chars().count(),
                FULL_NAME_MAX,
            ));
        }
    }
    Ok(())
}
