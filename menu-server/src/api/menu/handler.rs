//! Customer menu handlers
//!
//! Each handler locks its session for the whole operation, so a session
//! sees one mutation at a time. Catalog loads run unlocked and are applied
//! through a [`LoadTicket`](crate::menu::LoadTicket); a reload that starts
//! later wins.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::cart::MAX_LINE_QUANTITY;
use shared::models::Order;
use validator::Validate;

use crate::api::{ApiResponse, AppResult, ValidJson};
use crate::core::AppState;
use crate::menu::{MenuSessionView, SessionSlot};
use crate::orders::CheckoutForm;

/// QR link parameters
#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    pub restaurant: Option<String>,
    pub table: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OpenedSession {
    pub session_id: String,
    #[serde(flatten)]
    pub view: MenuSessionView,
}

#[derive(Debug, Deserialize)]
pub struct SelectCategoryRequest {
    pub category_id: String,
}

/// Upper bound for line updates; anything at or below zero removes the line
const MAX_UPDATE_QUANTITY: i64 = MAX_LINE_QUANTITY as i64;

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddToCartRequest {
    pub item_id: String,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, max = MAX_LINE_QUANTITY))]
    pub quantity: u32,
    #[validate(length(max = 500))]
    pub special_instructions: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLineRequest {
    #[validate(range(max = MAX_UPDATE_QUANTITY))]
    pub quantity: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(length(max = 200))]
    pub customer_name: String,
    #[validate(length(max = 100))]
    pub customer_phone: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

impl From<CheckoutRequest> for CheckoutForm {
    fn from(req: CheckoutRequest) -> Self {
        CheckoutForm {
            customer_name: req.customer_name,
            customer_phone: req.customer_phone,
            notes: req.notes,
        }
    }
}

async fn load_into(state: &AppState, slot: &SessionSlot, query: &MenuQuery) -> MenuSessionView {
    let ticket = slot.lock().await.begin_load();
    let catalog = state
        .catalog
        .load(query.restaurant.as_deref(), query.table.as_deref())
        .await;
    let mut session = slot.lock().await;
    session.finish_load(ticket, catalog);
    session.view()
}

fn find_slot(state: &AppState, id: &str) -> AppResult<Arc<SessionSlot>> {
    Ok(state.menu_sessions.get(id)?)
}

pub async fn open(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<ApiResponse<OpenedSession>> {
    let (id, slot) = state.menu_sessions.create();
    let view = load_into(&state, &slot, &query).await;
    tracing::debug!(session_id = %id, restaurant = ?query.restaurant, table = ?query.table, "Menu session opened");
    Ok(ApiResponse::success(OpenedSession {
        session_id: id.to_string(),
        view,
    }))
}

pub async fn view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<MenuSessionView>> {
    let slot = find_slot(&state, &id)?;
    let view = slot.lock().await.view();
    Ok(ApiResponse::success(view))
}

pub async fn reload(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MenuQuery>,
) -> AppResult<ApiResponse<MenuSessionView>> {
    let slot = find_slot(&state, &id)?;
    Ok(ApiResponse::success(load_into(&state, &slot, &query).await))
}

pub async fn select_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SelectCategoryRequest>,
) -> AppResult<ApiResponse<MenuSessionView>> {
    let slot = find_slot(&state, &id)?;
    let mut session = slot.lock().await;
    session.select_category(&req.category_id)?;
    Ok(ApiResponse::success(session.view()))
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<AddToCartRequest>,
) -> AppResult<ApiResponse<MenuSessionView>> {
    let slot = find_slot(&state, &id)?;
    let mut session = slot.lock().await;
    session.add_to_cart(&req.item_id, req.quantity, req.special_instructions.as_deref())?;
    Ok(ApiResponse::success(session.view()))
}

pub async fn update_line(
    State(state): State<AppState>,
    Path((id, line_id)): Path<(String, String)>,
    ValidJson(req): ValidJson<UpdateLineRequest>,
) -> AppResult<ApiResponse<MenuSessionView>> {
    let slot = find_slot(&state, &id)?;
    let mut session = slot.lock().await;
    session.update_cart_line(&line_id, req.quantity)?;
    Ok(ApiResponse::success(session.view()))
}

pub async fn remove_line(
    State(state): State<AppState>,
    Path((id, line_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<MenuSessionView>> {
    let slot = find_slot(&state, &id)?;
    let mut session = slot.lock().await;
    session.remove_cart_line(&line_id)?;
    Ok(ApiResponse::success(session.view()))
}

/// Holds the session lock across the store write so the cart cannot change
/// underneath the order snapshot.
pub async fn checkout(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<CheckoutRequest>,
) -> AppResult<ApiResponse<Order>> {
    let slot = find_slot(&state, &id)?;
    let mut session = slot.lock().await;
    let order = state.submitter.submit(&mut *session, req.into()).await?;
    Ok(ApiResponse::success(order))
}
