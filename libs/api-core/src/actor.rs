use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::ApiError;

/// The authenticated identity performing a request. Resolved by the auth
/// middleware before any handler runs; the services themselves never parse
/// credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl policy::HasId for Actor {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl policy::HasSuperuser for Actor {
    fn is_superuser(&self) -> bool {
        self.is_superuser
    }
}

/// Extractor pulling the [`Actor`] resolved by the auth middleware out of
/// request extensions. Rejects with 401 when no identity was resolved.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Actor);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .copied()
            .map(CurrentUser)
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))
    }
}
