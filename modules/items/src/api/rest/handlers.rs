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
use policy::{require_owner_or_superuser, Deny};

use crate::api::rest::dto::{CreateItemReq, ItemDto, ItemListDto, UpdateItemReq};
use crate::contract::model::Item;
use crate::domain::{error::DomainError, service::Service};

/// List items. Superusers see everything; everyone else sees their own.
/// The narrowing is a visibility branch, not an authorization failure.
pub async fn list_items(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<ItemListDto>, ApiError> {
    let page = if actor.is_superuser {
        svc.list_items(query.skip, query.limit).await
    } else {
        svc.list_by_owner(actor.id, query.skip, query.limit).await
    }
    .map_err(map_domain_error)?;

    Ok(Json(ItemListDto {
        data: page.data.into_iter().map(ItemDto::from).collect(),
        count: page.count,
    }))
}

/// Create an item owned by the actor.
pub async fn create_item(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreateItemReq>,
) -> Result<(StatusCode, Json<ItemDto>), ApiError> {
    let item = svc
        .create_with_owner(req.into(), actor.id)
        .await
        .map_err(map_domain_error)?;
    Ok((StatusCode::CREATED, Json(ItemDto::from(item))))
}

/// Get one item: its owner or a superuser.
pub async fn get_item(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemDto>, ApiError> {
    let item = load_item_or_404(&svc, id).await?;
    require_owner_or_superuser(item.owner_id, &actor, Deny::default())?;
    Ok(Json(ItemDto::from(item)))
}

/// Partial update of an item: its owner or a superuser.
pub async fn update_item(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateItemReq>,
) -> Result<Json<ItemDto>, ApiError> {
    let item = load_item_or_404(&svc, id).await?;
    require_owner_or_superuser(item.owner_id, &actor, Deny::default())?;

    let updated = svc
        .update_item(&item, req.into())
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ItemDto::from(updated)))
}

/// Delete an item: its owner or a superuser.
pub async fn delete_item(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, ApiError> {
    let item = load_item_or_404(&svc, id).await?;
    require_owner_or_superuser(item.owner_id, &actor, Deny::default())?;

    info!(item_id = %id, "deleting item");
    svc.delete_item(item).await.map_err(map_domain_error)?;
    Ok(Json(Message::new("Item deleted successfully")))
}

async fn load_item_or_404(svc: &Service, id: Uuid) -> Result<Item, ApiError> {
    svc.get_item(id)
        .await
        .map_err(map_domain_error)?
        .ok_or_else(|| ApiError::not_found("Item not found"))
}

/// Map domain errors to the wire error.
fn map_domain_error(error: DomainError) -> ApiError {
    match error {
        DomainError::ItemNotFound { .. } => ApiError::not_found("Item not found"),
        DomainError::TitleLength { .. } | DomainError::DescriptionTooLong { .. } => {
            ApiError::bad_request(error.to_string())
        }
        DomainError::Database { message } => ApiError::internal(message),
    }
}
