//! Health check
//!
//! `GET /health` (public)
//!
//! ```json
//! { "status": "ok", "version": "0.1.0", "demo": true, "menu_sessions": 2 }
//! ```

use axum::{Router, extract::State, routing::get};
use serde::Serialize;

use super::{ApiResponse, AppResult};
use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// Serving built-in demo data instead of the hosted store
    demo: bool,
    menu_sessions: usize,
}

async fn health(State(state): State<AppState>) -> AppResult<ApiResponse<HealthResponse>> {
    Ok(ApiResponse::success(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        demo: state.is_demo(),
        menu_sessions: state.menu_sessions.len(),
    }))
}
