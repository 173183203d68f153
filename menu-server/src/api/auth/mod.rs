//! Authentication routes
//!
//! - `POST /api/auth/sign-in`: public
//! - `POST /api/auth/sign-up`: `staff_manage`, creates staff in the caller's restaurant
//! - `POST /api/auth/sign-out`, `GET /api/auth/me`: bearer token required

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::permissions::STAFF_MANAGE;
use crate::auth::require_permission;
use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<AppState> {
    let staff_routes = Router::new()
        .route("/sign-up", post(handler::sign_up))
        .layer(middleware::from_fn(require_permission(STAFF_MANAGE)));

    Router::new()
        .route("/sign-in", post(handler::sign_in))
        .route("/sign-out", post(handler::sign_out))
        .route("/me", get(handler::me))
        .merge(staff_routes)
}
