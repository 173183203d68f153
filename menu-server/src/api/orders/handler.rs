//! Dashboard order handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Order, OrderStatus};

use crate::api::{ApiResponse, AppResult};
use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::utils::AppError;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Filter for the chef / cashier views; `pending` is accepted for `new`
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: OrderStatus,
}

/// Newest first
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(|e| AppError::validation(e).with_detail("field", "status"))?;

    let mut board = state.order_board(user.restaurant_id()?);
    board.refresh().await?;
    let orders = match status {
        Some(status) => board.by_status(status).into_iter().cloned().collect(),
        None => board.orders().to_vec(),
    };
    Ok(ApiResponse::success(orders))
}

pub async fn set_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> AppResult<ApiResponse<Order>> {
    let mut board = state.order_board(user.restaurant_id()?);
    let order = board.set_status(&id, req.status).await?;
    tracing::info!(order_id = %id, user_id = %user.id, status = %order.status, "Order status set");
    Ok(ApiResponse::success(order))
}

pub async fn advance(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let mut board = state.order_board(user.restaurant_id()?);
    let order = board.advance(&id).await?;
    Ok(ApiResponse::success(order))
}
