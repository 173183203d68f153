//! Checkout
//!
//! Turns a ready menu session's cart into an order. The order insert and the
//! table occupancy update happen in one gateway operation. On failure the
//! cart is left untouched so the customer can retry; on success it is
//! cleared.

use std::sync::Arc;

use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{NewOrder, Order, OrderStatus, TableStatus};
use shared::util::now_millis;
use thiserror::Error;

use crate::gateway::{DataGateway, GatewayError};
use crate::menu::{MenuError, MenuSession};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
};

/// Customer details entered at checkout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Cart is empty")]
    OrderEmpty,

    #[error("Customer name is required")]
    CustomerNameRequired,

    #[error(transparent)]
    Validation(AppError),

    #[error(transparent)]
    Menu(#[from] MenuError),

    /// Store write failed; the cart is intact
    #[error("Order submission failed: {0}")]
    Gateway(#[from] GatewayError),
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::OrderEmpty => AppError::new(ErrorCode::OrderEmpty),
            SubmissionError::CustomerNameRequired => {
                AppError::new(ErrorCode::CustomerNameRequired).with_detail("field", "customer_name")
            }
            SubmissionError::Validation(e) => e,
            SubmissionError::Menu(e) => e.into(),
            SubmissionError::Gateway(_) => AppError::new(ErrorCode::OrderSubmissionFailed),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct OrderSubmitter {
    gateway: Arc<dyn DataGateway>,
}

impl OrderSubmitter {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self { gateway }
    }

    /// Build the order snapshot, checking preconditions. No I/O.
    pub fn prepare(session: &MenuSession, form: CheckoutForm) -> Result<NewOrder, SubmissionError> {
        let ready = session.ready()?;
        if ready.cart.is_empty() {
            return Err(SubmissionError::OrderEmpty);
        }

        let customer_name = form.customer_name.trim().to_string();
        if customer_name.is_empty() {
            return Err(SubmissionError::CustomerNameRequired);
        }
        let check = |value: &Option<String>, field: &str, max: usize| {
            validate_optional_text(value, field, max).map_err(SubmissionError::Validation)
        };
        check(&Some(customer_name.clone()), "customer_name", MAX_NAME_LEN)?;
        check(&form.customer_phone, "customer_phone", MAX_SHORT_TEXT_LEN)?;
        check(&form.notes, "notes", MAX_NOTE_LEN)?;

        Ok(NewOrder {
            restaurant_id: ready.catalog.restaurant.id.clone(),
            table_id: ready.catalog.table.id.clone(),
            customer_name,
            customer_phone: non_empty(form.customer_phone),
            items: ready.cart.to_order_lines(),
            total_amount: ready.cart.total_amount(),
            notes: non_empty(form.notes),
            status: OrderStatus::New,
            created_at: now_millis(),
        })
    }

    pub async fn submit(
        &self,
        session: &mut MenuSession,
        form: CheckoutForm,
    ) -> Result<Order, SubmissionError> {
        let new_order = Self::prepare(session, form)?;

        let order = match self.gateway.submit_order(&new_order).await {
            Ok(order) => order,
            Err(e) => {
                tracing::warn!(
                    restaurant_id = %new_order.restaurant_id,
                    table_id = %new_order.table_id,
                    error = %e,
                    "Order submission failed, cart kept"
                );
                return Err(e.into());
            }
        };

        let ready = session.ready_mut()?;
        ready.cart.clear();
        ready.catalog.table.status = TableStatus::Occupied;

        tracing::info!(
            order_id = %order.id,
            restaurant_id = %order.restaurant_id,
            table_id = %order.table_id,
            total = %order.total_amount,
            "Order submitted"
        );
        Ok(order)
    }
}
