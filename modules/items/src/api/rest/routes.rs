use std::sync::Arc;

use axum::{
    routing::{get, put},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Build the items route tree. Identity middleware is attached by the app.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route(
            "/items",
            get(handlers::list_items).post(handlers::create_item),
        )
        .route(
            "/items/{id}",
            put(handlers::update_item)
                .get(handlers::get_item)
                .delete(handlers::delete_item),
        )
        .layer(Extension(service))
}
