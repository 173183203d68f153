//! Customer menu routes (public)
//!
//! | Method | Path | |
//! |--------|------|-|
//! | POST | `/api/menu/sessions?restaurant=&table=` | open a session from a QR link |
//! | GET | `/api/menu/sessions/{id}` | current menu view |
//! | POST | `/api/menu/sessions/{id}/reload` | reload the catalog (cart is dropped) |
//! | PUT | `/api/menu/sessions/{id}/category` | select category |
//! | POST | `/api/menu/sessions/{id}/cart` | add item |
//! | PUT | `/api/menu/sessions/{id}/cart/{line_id}` | set quantity (≤ 0 removes) |
//! | DELETE | `/api/menu/sessions/{id}/cart/{line_id}` | remove line |
//! | POST | `/api/menu/sessions/{id}/checkout` | submit the order |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(handler::open))
        .route("/sessions/{id}", get(handler::view))
        .route("/sessions/{id}/reload", post(handler::reload))
        .route("/sessions/{id}/category", put(handler::select_category))
        .route("/sessions/{id}/cart", post(handler::add_to_cart))
        .route(
            "/sessions/{id}/cart/{line_id}",
            put(handler::update_line).delete(handler::remove_line),
        )
        .route("/sessions/{id}/checkout", post(handler::checkout))
}
