use std::sync::Arc;

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{Json, Response},
    Extension,
};
use tracing::debug;

use api_core::{Actor, ApiError, CurrentUser, TokenSigner};
use policy::require_active;

use crate::api::rest::dto::{LoginReq, TokenDto, UserDto};
use crate::api::rest::handlers::{load_user_or_404, map_domain_error};
use crate::contract::client::UsersApi;
use crate::domain::service::Service;

/// Exchange email/password credentials for a bearer token.
///
/// Unknown email and wrong password are deliberately indistinguishable.
pub async fn login_access_token(
    Extension(svc): Extension<Arc<Service>>,
    Extension(signer): Extension<Arc<dyn TokenSigner>>,
    Json(req): Json<LoginReq>,
) -> Result<Json<TokenDto>, ApiError> {
    let user = svc
        .authenticate(&req.email, &req.password)
        .await
        .map_err(map_domain_error)?
        .ok_or_else(|| ApiError::bad_request("Incorrect email or password"))?;
    require_active(user.is_active)?;

    let token = signer
        .issue(user.id)
        .map_err(|err| ApiError::internal(err.to_string()))?;
    Ok(Json(TokenDto::bearer(token)))
}

/// Echo back the authenticated user; a cheap token sanity check for clients.
pub async fn test_token(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<UserDto>, ApiError> {
    let user = load_user_or_404(&svc, actor.id).await?;
    Ok(Json(UserDto::from(user)))
}

/// Resolve a bearer token into an [`Actor`] request extension.
///
/// Requests without an `Authorization` header pass through untouched; the
/// [`CurrentUser`] extractor rejects them at protected handlers. A present
/// but invalid token fails the whole request here.
pub async fn resolve_identity(
    Extension(users): Extension<Arc<dyn UsersApi>>,
    Extension(signer): Extension<Arc<dyn TokenSigner>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(&req) else {
        return Ok(next.run(req).await);
    };

    let user_id = signer
        .verify(&token)
        .ok_or_else(|| ApiError::unauthorized("Could not validate credentials"))?;

    let user = users
        .get_user(user_id)
        .await
        .map_err(|err| {
            debug!(%user_id, error = %err, "token subject lookup failed");
            ApiError::unauthorized("Could not validate credentials")
        })?
        .ok_or_else(|| ApiError::unauthorized("Could not validate credentials"))?;
    if !user.is_active {
        return Err(ApiError::bad_request("Inactive user"));
    }

    req.extensions_mut().insert(Actor {
        id: user.id,
        is_active: user.is_active,
        is_superuser: user.is_superuser,
    });
    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_owned())
}
