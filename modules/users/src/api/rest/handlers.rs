use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::Json,
    Extension,
};
use tracing::info;
use uuid::Uuid;

use api_core::{ApiError, CurrentUser, Message, PageQuery};
use policy::{require_not_self, require_superuser};

use crate::api::rest::dto::{
    CreateUserReq, RegisterReq, UpdateMeReq, UpdatePasswordReq, UpdateUserReq, UserDto,
    UserListDto,
};
use crate::contract::model::{User, UserPatch};
use crate::domain::{error::DomainError, service::Service};

/// List users with pagination (superuser only).
pub async fn list_users(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<UserListDto>, ApiError> {
    require_superuser(&actor)?;

    let page = svc
        .list_users(query.skip, query.limit)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(UserListDto {
        data: page.data.into_iter().map(UserDto::from).collect(),
        count: page.count,
    }))
}

/// Create a new user with explicit role flags (superuser only).
pub async fn create_user(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreateUserReq>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    require_superuser(&actor)?;
    info!(email = %req.email, "creating user");

    ensure_email_free(&svc, &req.email, None).await?;
    let user = svc
        .create_user(req.into())
        .await
        .map_err(map_domain_error)?;
    Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}

/// Open self-registration: role flags are fixed at their defaults.
pub async fn register_user(
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<RegisterReq>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    info!(email = %req.email, "user signup");

    ensure_email_free(&svc, &req.email, None).await?;
    let user = svc
        .create_user(req.into())
        .await
        .map_err(map_domain_error)?;
    Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}

/// Current user's own profile.
pub async fn get_me(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<UserDto>, ApiError> {
    let user = load_user_or_404(&svc, actor.id).await?;
    Ok(Json(UserDto::from(user)))
}

/// Self-service profile update (email and full name only).
pub async fn update_me(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<UpdateMeReq>,
) -> Result<Json<UserDto>, ApiError> {
    if let Some(email) = req.email.as_deref() {
        ensure_email_free(&svc, email, Some(actor.id)).await?;
    }

    let existing = load_user_or_404(&svc, actor.id).await?;
    let updated = svc
        .update_user(&existing, req.into())
        .await
        .map_err(map_domain_error)?;
    Ok(Json(UserDto::from(updated)))
}

/// Self-service password change; requires the current password.
pub async fn update_password_me(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<UpdatePasswordReq>,
) -> Result<Json<Message>, ApiError> {
    let existing = load_user_or_404(&svc, actor.id).await?;

    if !svc.verify_password(&req.current_password, &existing) {
        return Err(ApiError::bad_request("Incorrect password"));
    }
    if req.current_password == req.new_password {
        return Err(ApiError::bad_request(
            "New password cannot be the same as the current one",
        ));
    }

    let patch = UserPatch {
        password: Some(req.new_password),
        ..Default::default()
    };
    svc.update_user(&existing, patch)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(Message::new("Password updated successfully")))
}

/// Delete own account. Superusers must be deleted by another superuser.
pub async fn delete_me(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Message>, ApiError> {
    if actor.is_superuser {
        return Err(ApiError::forbidden(
            "Super users are not allowed to delete themselves",
        ));
    }

    info!(user_id = %actor.id, "deleting own account");
    if !svc.delete_user(actor.id).await.map_err(map_domain_error)? {
        return Err(ApiError::not_found("User not found"));
    }
    Ok(Json(Message::new("User deleted successfully")))
}

/// Get a specific user: self always, anyone else only as superuser.
pub async fn get_user(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserDto>, ApiError> {
    let user = load_user_or_404(&svc, id).await?;
    if user.id != actor.id {
        require_superuser(&actor)?;
    }
    Ok(Json(UserDto::from(user)))
}

/// Update an arbitrary user (superuser only).
pub async fn update_user(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserReq>,
) -> Result<Json<UserDto>, ApiError> {
    require_superuser(&actor)?;

    let existing = svc
        .get_user(id)
        .await
        .map_err(map_domain_error)?
        .ok_or_else(|| {
            ApiError::not_found("The user with this id does not exist in the system")
        })?;

    if let Some(email) = req.email.as_deref() {
        ensure_email_free(&svc, email, Some(existing.id)).await?;
    }

    let updated = svc
        .update_user(&existing, req.into())
        .await
        .map_err(map_domain_error)?;
    Ok(Json(UserDto::from(updated)))
}

/// Delete an arbitrary user (superuser only, never oneself). Owned items are
/// removed by the store-level cascade.
pub async fn delete_user(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, ApiError> {
    require_superuser(&actor)?;
    require_not_self(id, &actor, "Super users are not allowed to delete themselves")?;

    info!(user_id = %id, "deleting user");
    if !svc.delete_user(id).await.map_err(map_domain_error)? {
        return Err(ApiError::not_found("User not found"));
    }
    Ok(Json(Message::new("User deleted successfully")))
}

/// Fetch by id or fail with NotFound; the "get or absent" store contract
/// stays intact underneath.
pub(crate) async fn load_user_or_404(svc: &Service, id: Uuid) -> Result<User, ApiError> {
    svc.get_user(id)
        .await
        .map_err(map_domain_error)?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// Reject an email that already belongs to a different user.
async fn ensure_email_free(
    svc: &Service,
    email: &str,
    allow_id: Option<Uuid>,
) -> Result<(), ApiError> {
    match svc.get_by_email(email).await.map_err(map_domain_error)? {
        Some(owner) if Some(owner.id) != allow_id => Err(ApiError::conflict(
            "The user with this email already exists in the system",
        )),
        _ => Ok(()),
    }
}

/// Map domain errors to the wire error.
pub(crate) fn map_domain_error(error: DomainError) -> ApiError {
    match error {
        DomainError::UserNotFound { .. } => ApiError::not_found("User not found"),
        DomainError::EmailAlreadyExists { .. } => {
            ApiError::conflict("The user with this email already exists in the system")
        }
        DomainError::InvalidEmail { .. }
        | DomainError::PasswordLength { .. }
        | DomainError::FullNameTooLong { .. } => ApiError::bad_request(error.to_string()),
        DomainError::Credential => ApiError::internal("credential hashing failed"),
        DomainError::Database { message } => ApiError::internal(message),
    }
}
