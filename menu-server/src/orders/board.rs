//! Dashboard order board
//!
//! Per-restaurant order list shared by the admin, cashier and chef views.
//! Status changes are checked against [`OrderStatus::can_transition_to`]
//! and written back to the store before the local copy changes.

use std::sync::Arc;

use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderStatus};
use thiserror::Error;

use crate::gateway::{DataGateway, GatewayError, Query, Table};

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Order {0} not found")]
    OrderNotFound(String),

    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Order {0} has already been delivered")]
    AlreadyDelivered(String),

    #[error("Order {0} has already been cancelled")]
    AlreadyCancelled(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl From<BoardError> for AppError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::OrderNotFound(id) => {
                AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", id)
            }
            BoardError::InvalidTransition { from, to } => {
                AppError::new(ErrorCode::InvalidStatusTransition)
                    .with_detail("from", from.as_str())
                    .with_detail("to", to.as_str())
            }
            BoardError::AlreadyDelivered(id) => {
                AppError::new(ErrorCode::OrderAlreadyDelivered).with_detail("order_id", id)
            }
            BoardError::AlreadyCancelled(id) => {
                AppError::new(ErrorCode::OrderAlreadyCancelled).with_detail("order_id", id)
            }
            BoardError::Gateway(e) => e.into(),
        }
    }
}

pub struct OrderBoard {
    gateway: Arc<dyn DataGateway>,
    restaurant_id: String,
    orders: Vec<Order>,
}

impl OrderBoard {
    pub fn new(gateway: Arc<dyn DataGateway>, restaurant_id: impl Into<String>) -> Self {
        Self {
            gateway,
            restaurant_id: restaurant_id.into(),
            orders: Vec::new(),
        }
    }

    pub fn restaurant_id(&self) -> &str {
        &self.restaurant_id
    }

    /// Reload this restaurant's orders, newest first
    pub async fn refresh(&mut self) -> Result<&[Order], BoardError> {
        let query = Query::from(Table::Orders)
            .eq("restaurant_id", self.restaurant_id.as_str())
            .order("created_at", false);
        let mut orders: Vec<Order> = self.gateway.many(&query).await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.orders = orders;
        Ok(&self.orders)
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn by_status(&self, status: OrderStatus) -> Vec<&Order> {
        self.orders.iter().filter(|o| o.status == status).collect()
    }

    async fn find(&self, order_id: &str) -> Result<Order, BoardError> {
        if let Some(order) = self.orders.iter().find(|o| o.id == order_id) {
            return Ok(order.clone());
        }
        let query = Query::from(Table::Orders)
            .eq("id", order_id)
            .eq("restaurant_id", self.restaurant_id.as_str())
            .limit(1);
        self.gateway
            .maybe_single::<Order>(&query)
            .await?
            .ok_or_else(|| BoardError::OrderNotFound(order_id.to_string()))
    }

    pub async fn set_status(
        &mut self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<Order, BoardError> {
        let current = self.find(order_id).await?;
        if !current.status.can_transition_to(status) {
            return Err(match current.status {
                OrderStatus::Delivered => BoardError::AlreadyDelivered(current.id),
                OrderStatus::Cancelled => BoardError::AlreadyCancelled(current.id),
                from => BoardError::InvalidTransition { from, to: status },
            });
        }

        let query = Query::from(Table::Orders)
            .eq("id", order_id)
            .eq("restaurant_id", self.restaurant_id.as_str());
        let updated: Vec<Order> = self
            .gateway
            .update_as(&query, json!({ "status": status }))
            .await?;
        let updated = updated
            .into_iter()
            .next()
            .ok_or_else(|| BoardError::OrderNotFound(order_id.to_string()))?;

        match self.orders.iter_mut().find(|o| o.id == order_id) {
            Some(local) => *local = updated.clone(),
            None => self.orders.insert(0, updated.clone()),
        }

        tracing::info!(
            order_id = %updated.id,
            restaurant_id = %self.restaurant_id,
            from = %current.status,
            to = %updated.status,
            "Order status changed"
        );
        Ok(updated)
    }

    /// Move an order to its next stage
    pub async fn advance(&mut self, order_id: &str) -> Result<Order, BoardError> {
        let current = self.find(order_id).await?;
        match current.status.next() {
            Some(next) => self.set_status(order_id, next).await,
            None if current.status == OrderStatus::Delivered => {
                Err(BoardError::AlreadyDelivered(current.id))
            }
            None => Err(BoardError::AlreadyCancelled(current.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use rust_decimal::Decimal;
    use shared::models::NewOrder;

    fn order(id: &str, restaurant: &str, status: OrderStatus, created_at: i64) -> Order {
        NewOrder {
            restaurant_id: restaurant.to_string(),
            table_id: "t1".to_string(),
            customer_name: "Sara".to_string(),
            customer_phone: None,
            items: Vec::new(),
            total_amount: Decimal::from(10),
            notes: None,
            status,
            created_at,
        }
        .into_order(id.to_string())
    }

    fn board() -> (Arc<MemoryGateway>, OrderBoard) {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.seed(
            Table::Orders,
            &[
                order("o1", "r1", OrderStatus::New, 100),
                order("o2", "r1", OrderStatus::Ready, 300),
                order("o3", "r1", OrderStatus::Delivered, 200),
                order("ox", "r2", OrderStatus::New, 400),
            ],
        );
        let board = OrderBoard::new(gateway.clone(), "r1");
        (gateway, board)
    }

    fn stored_status(gateway: &MemoryGateway, id: &str) -> String {
        gateway
            .rows(Table::Orders)
            .into_iter()
            .find(|r| r["id"] == id)
            .map(|r| r["status"].as_str().unwrap_or_default().to_string())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_refresh_scoped_and_newest_first() {
        let (_, mut board) = board();
        let ids: Vec<_> = board
            .refresh()
            .await
            .unwrap()
            .iter()
            .map(|o| o.id.clone())
            .collect();
        assert_eq!(ids, vec!["o2", "o3", "o1"]);
        assert_eq!(board.by_status(OrderStatus::New).len(), 1);
    }

    #[tokio::test]
    async fn test_advance_writes_back() {
        let (gateway, mut board) = board();
        board.refresh().await.unwrap();

        let order = board.advance("o1").await.unwrap();
        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(stored_status(&gateway, "o1"), "preparing");
        assert_eq!(board.by_status(OrderStatus::Preparing).len(), 1);

        board.advance("o2").await.unwrap();
        assert_eq!(stored_status(&gateway, "o2"), "delivered");
    }

    #[tokio::test]
    async fn test_invalid_transition_writes_nothing() {
        let (gateway, mut board) = board();

        assert!(matches!(
            board.set_status("o1", OrderStatus::Delivered).await,
            Err(BoardError::InvalidTransition {
                from: OrderStatus::New,
                to: OrderStatus::Delivered
            })
        ));
        assert!(matches!(
            board.set_status("o3", OrderStatus::Cancelled).await,
            Err(BoardError::AlreadyDelivered(_))
        ));
        assert!(matches!(board.advance("o3").await, Err(BoardError::AlreadyDelivered(_))));
        assert_eq!(stored_status(&gateway, "o1"), "new");
    }

    #[tokio::test]
    async fn test_cancel_then_absorbing() {
        let (_, mut board) = board();
        board.set_status("o1", OrderStatus::Cancelled).await.unwrap();
        assert!(matches!(
            board.advance("o1").await,
            Err(BoardError::AlreadyCancelled(_))
        ));
    }

    #[tokio::test]
    async fn test_other_restaurant_order_not_found() {
        let (gateway, mut board) = board();
        assert!(matches!(
            board.advance("ox").await,
            Err(BoardError::OrderNotFound(_))
        ));
        assert_eq!(stored_status(&gateway, "ox"), "new");
    }

    #[tokio::test]
    async fn test_gateway_failure_leaves_local_state() {
        let (gateway, mut board) = board();
        board.refresh().await.unwrap();
        gateway.fail_table(Table::Orders);
        assert!(matches!(board.advance("o1").await, Err(BoardError::Gateway(_))));
        assert_eq!(board.by_status(OrderStatus::New).len(), 1);
    }
}
