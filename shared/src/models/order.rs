//! Order Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status
///
/// `New -> Preparing -> Ready -> Delivered`, with `Cancelled` reachable from
/// any non-terminal stage. Rows written by older clients use `pending` for
/// the first stage, so it is accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    #[serde(alias = "pending")]
    New,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Next stage on the kitchen line, `None` once delivered or cancelled
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::New => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        if target == OrderStatus::Cancelled {
            return !self.is_terminal();
        }
        self.next() == Some(target)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" | "pending" => Ok(OrderStatus::New),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// Order line (snapshot of a cart line at checkout)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub special_instructions: String,
}

impl OrderLine {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub restaurant_id: String,
    pub table_id: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub items: Vec<OrderLine>,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub status: OrderStatus,
    /// Creation time (epoch millis)
    pub created_at: i64,
}

/// Order as submitted from checkout, before the store assigns an id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub restaurant_id: String,
    pub table_id: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub items: Vec<OrderLine>,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub status: OrderStatus,
    pub created_at: i64,
}

impl NewOrder {
    pub fn into_order(self, id: String) -> Order {
        Order {
            id,
            restaurant_id: self.restaurant_id,
            table_id: self.table_id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            items: self.items,
            total_amount: self.total_amount,
            notes: self.notes,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_forward_transitions() {
        assert!(OrderStatus::New.can_transition_to(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Ready));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_no_skipping_or_going_back() {
        assert!(!OrderStatus::New.can_transition_to(OrderStatus::Ready));
        assert!(!OrderStatus::New.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Preparing));
        assert!(!OrderStatus::Preparing.can_transition_to(OrderStatus::Preparing));
    }

    #[test]
    fn test_cancel_rules() {
        assert!(OrderStatus::New.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_cancelled_is_absorbing() {
        for target in [
            OrderStatus::New,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Delivered,
        ] {
            assert!(!OrderStatus::Cancelled.can_transition_to(target));
        }
        assert_eq!(OrderStatus::Cancelled.next(), None);
    }

    #[test]
    fn test_pending_alias() {
        let status: OrderStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(status, OrderStatus::New);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"new\"");
        assert_eq!("pending".parse::<OrderStatus>().unwrap(), OrderStatus::New);
        assert!("served".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_line_total() {
        let line = OrderLine {
            item_id: "i1".into(),
            name: "Burger".into(),
            price: Decimal::new(4550, 2),
            quantity: 2,
            special_instructions: String::new(),
        };
        assert_eq!(line.line_total(), Decimal::new(9100, 2));
    }
}
