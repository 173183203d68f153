//! Dashboard order routes
//!
//! Scoped to the signed-in user's restaurant.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::permissions::{ORDERS_UPDATE, ORDERS_VIEW};
use crate::auth::require_permission;
use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<AppState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .layer(middleware::from_fn(require_permission(ORDERS_VIEW)));

    let update_routes = Router::new()
        .route("/{id}/status", put(handler::set_status))
        .route("/{id}/advance", post(handler::advance))
        .layer(middleware::from_fn(require_permission(ORDERS_UPDATE)));

    read_routes.merge(update_routes)
}
