use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Extension, Router,
};

use crate::api::rest::{auth, handlers};
use crate::domain::service::Service;

/// Build the users/auth route tree.
///
/// The token signer and the identity middleware are attached by the app;
/// this router only carries the module's own service.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/login/access-token", post(auth::login_access_token))
        .route("/login/test-token", post(auth::test_token))
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route("/users/signup", post(handlers::register_user))
        .route(
            "/users/me",
            get(handlers::get_me)
                .patch(handlers::update_me)
                .delete(handlers::delete_me),
        )
        .route("/users/me/password", patch(handlers::update_password_me))
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .patch(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .layer(Extension(service))
}
