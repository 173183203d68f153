//! HTTP API
//!
//! | Module | Prefix | Auth |
//! |--------|--------|------|
//! | [`health`] | `/health` | public |
//! | [`auth`] | `/api/auth` | sign-in public, sign-up needs `staff_manage` |
//! | [`menu`] | `/api/menu` | public (customer QR flow) |
//! | [`orders`] | `/api/orders` | `orders_view` / `orders_update` |
//! | [`restaurants`] | `/api/restaurants` | register public, tables `tables_manage` |
//!
//! Every response uses the [`ApiResponse`](shared::error::ApiResponse)
//! envelope.

pub mod auth;
pub mod health;
pub mod menu;
pub mod orders;
pub mod restaurants;

use axum::Router;
use axum::extract::{FromRequest, Request};
use axum::middleware;
use http::{HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use shared::error::AppError;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;
use validator::Validate;

use crate::auth::require_auth;
use crate::core::AppState;
use crate::utils::validation::from_validation_errors;

pub use crate::utils::{ApiResponse, AppResult};

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// JSON body that is deserialized and then checked with `validator`.
///
/// Malformed JSON and failed validation both come back as
/// `ValidationFailed` in the usual envelope.
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        value.validate().map_err(from_validation_errors)?;
        Ok(Self(value))
    }
}

/// Every route, no middleware, no state
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(menu::router())
        .merge(orders::router())
        .merge(restaurants::router())
}

/// Fully layered application
pub fn build_app(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    build_router()
        // Resolves the bearer token and injects CurrentUser; skips public routes
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        // Outermost so the id exists before propagation and tracing see the request
        .layer(SetRequestIdLayer::new(request_id, XRequestId))
}
