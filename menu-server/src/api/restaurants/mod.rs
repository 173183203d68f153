//! Restaurant routes
//!
//! - `POST /api/restaurants/register`: public onboarding
//! - `GET /api/restaurants/tables`: QR links for the caller's restaurant (`tables_manage`)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::permissions::TABLES_MANAGE;
use crate::auth::require_permission;
use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/restaurants", routes())
}

fn routes() -> Router<AppState> {
    let public_routes = Router::new().route("/register", post(handler::register));

    let manage_routes = Router::new()
        .route("/tables", get(handler::table_links))
        .layer(middleware::from_fn(require_permission(TABLES_MANAGE)));

    public_routes.merge(manage_routes)
}
