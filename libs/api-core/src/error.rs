use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use policy::{DenyKind, PolicyError};
use store::StoreError;
use thiserror::Error;

use crate::response::Message;

/// Wire-level error for the API: one variant per error kind the core can
/// surface. Rendered as a JSON `{"message": ...}` body with the matching
/// status code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    /// Internal detail is logged, never sent to the requester.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Internal(detail) => {
                tracing::error!(detail, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (self.status(), Json(Message { message })).into_response()
    }
}

impl From<PolicyError> for ApiError {
    fn from(err: PolicyError) -> Self {
        match err.kind {
            DenyKind::Forbidden => Self::Forbidden(err.message),
            DenyKind::BadRequest => Self::BadRequest(err.message),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => Self::Conflict("Resource already exists".to_string()),
            StoreError::Database(e) => Self::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use policy::Deny;
    use uuid::Uuid;

    #[test]
    fn status_codes_match_kinds() {
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::unauthorized("x").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::internal("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn policy_denials_map_to_selected_kind() {
        struct A(Uuid);
        impl policy::HasId for A {
            fn id(&self) -> Uuid {
                self.0
            }
        }
        impl policy::HasSuperuser for A {
            fn is_superuser(&self) -> bool {
                false
            }
        }

        let actor = A(Uuid::new_v4());

        let forbidden =
            policy::require_owner_or_superuser(Uuid::new_v4(), &actor, Deny::default())
                .unwrap_err();
        assert_eq!(
            ApiError::from(forbidden),
            ApiError::forbidden("Not enough permissions")
        );

        let bad = policy::require_owner_or_superuser(
            Uuid::new_v4(),
            &actor,
            Deny::bad_request("nope"),
        )
        .unwrap_err();
        assert_eq!(ApiError::from(bad), ApiError::bad_request("nope"));
    }

    #[test]
    fn internal_body_does_not_leak_detail() {
        let resp = ApiError::internal("connection refused to 10.0.0.5").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
