use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::UsersApi,
    error::UsersError,
    model::{NewUser, User, UserPatch},
};
use crate::domain::{error::DomainError, service::Service};

/// Local implementation of [`UsersApi`] that delegates to the domain service.
pub struct UsersLocalClient {
    service: Arc<Service>,
}

impl UsersLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UsersApi for UsersLocalClient {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, UsersError> {
        self.service.get_user(id).await.map_err(map_domain_error)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, UsersError> {
        self.service
            .create_user(new_user)
            .await
            .map_err(map_domain_error)
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<User, UsersError> {
        let existing = self
            .service
            .get_user(id)
            .await
            .map_err(map_domain_error)?
            .ok_or_else(|| UsersError::not_found(id))?;
        self.service
            .update_user(&existing, patch)
            .await
            .map_err(map_domain_error)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, UsersError> {
        self.service.delete_user(id).await.map_err(map_domain_error)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, UsersError> {
        self.service
            .authenticate(email, password)
            .await
            .map_err(map_domain_error)
    }
}

/// Map domain errors to the client-safe contract error.
fn map_domain_error(err: DomainError) -> UsersError {
    match err {
        DomainError::UserNotFound { id } => UsersError::not_found(id),
        DomainError::EmailAlreadyExists { email } => UsersError::conflict(email),
        DomainError::InvalidEmail { email } => {
            UsersError::validation(format!("Invalid email: {email}"))
        }
        DomainError::PasswordLength { len, min, max } => UsersError::validation(format!(
            "Password length {len} outside allowed range {min}..={max}"
        )),
        DomainError::FullNameTooLong { len, max } => {
            UsersError::validation(format!("Full name too long: {len} characters (max: {max})"))
        }
        DomainError::Credential | DomainError::Database { .. } => UsersError::internal(),
    }
}
