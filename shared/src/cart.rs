//! Customer cart
//!
//! An ordered list of lines keyed by `(item_id, special_instructions)`.
//! Name and price are snapshotted when a line is created and never
//! re-fetched. Totals are computed from the current lines on every call.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{AppError, ErrorCode};
use crate::models::{MenuItem, OrderLine};

/// Largest quantity a single line may hold
pub const MAX_LINE_QUANTITY: u32 = 99;

/// Cart errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Menu item {0} is not available")]
    ItemUnavailable(String),

    #[error("Quantity must be between 1 and 99")]
    InvalidQuantity,

    #[error("Cart line {0} not found")]
    LineNotFound(String),
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        let code = match &err {
            CartError::ItemUnavailable(_) => ErrorCode::MenuItemUnavailable,
            CartError::InvalidQuantity => ErrorCode::InvalidQuantity,
            CartError::LineNotFound(_) => ErrorCode::CartLineNotFound,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// One distinct (item, instructions) combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub line_id: String,
    pub item_id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    /// Empty string when the customer left no instructions
    pub special_instructions: String,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Merge into an existing line with the same item and instructions, or
    /// append a new one. Returns the affected line.
    pub fn add(
        &mut self,
        item: &MenuItem,
        quantity: u32,
        instructions: Option<&str>,
    ) -> Result<&CartLine, CartError> {
        if quantity == 0 || quantity > MAX_LINE_QUANTITY {
            return Err(CartError::InvalidQuantity);
        }
        if !item.is_available {
            return Err(CartError::ItemUnavailable(item.id.clone()));
        }

        let instructions = instructions.unwrap_or_default();
        let idx = match self
            .lines
            .iter()
            .position(|l| l.item_id == item.id && l.special_instructions == instructions)
        {
            Some(idx) => {
                let line = &mut self.lines[idx];
                let merged = line.quantity + quantity;
                if merged > MAX_LINE_QUANTITY {
                    return Err(CartError::InvalidQuantity);
                }
                line.quantity = merged;
                idx
            }
            None => {
                self.lines.push(CartLine {
                    line_id: crate::util::new_id(),
                    item_id: item.id.clone(),
                    name: item.name.clone(),
                    price: item.price,
                    quantity,
                    special_instructions: instructions.to_string(),
                });
                self.lines.len() - 1
            }
        };
        Ok(&self.lines[idx])
    }

    /// Set a line's quantity; zero or below removes the line.
    pub fn update_line(&mut self, line_id: &str, quantity: i64) -> Result<(), CartError> {
        if quantity > i64::from(MAX_LINE_QUANTITY) {
            return Err(CartError::InvalidQuantity);
        }
        let idx = self
            .lines
            .iter()
            .position(|l| l.line_id == line_id)
            .ok_or_else(|| CartError::LineNotFound(line_id.to_string()))?;

        if quantity <= 0 {
            self.lines.remove(idx);
        } else {
            self.lines[idx].quantity = u32::try_from(quantity).unwrap_or(MAX_LINE_QUANTITY);
        }
        Ok(())
    }

    /// Remove a line. Returns whether a line was removed.
    pub fn remove_line(&mut self, line_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.line_id != line_id);
        self.lines.len() != before
    }

    pub fn total_amount(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn total_items(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |total, l| total.saturating_add(l.quantity))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Snapshot the lines for an order
    pub fn to_order_lines(&self) -> Vec<OrderLine> {
        self.lines
            .iter()
            .map(|l| OrderLine {
                item_id: l.item_id.clone(),
                name: l.name.clone(),
                price: l.price,
                quantity: l.quantity,
                special_instructions: l.special_instructions.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: i64) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            restaurant_id: "r1".to_string(),
            category_id: "c1".to_string(),
            name: id.to_string(),
            description: String::new(),
            price: Decimal::from(price),
            is_available: true,
            preparation_time: None,
            image_url: None,
        }
    }

    #[test]
    fn test_same_item_same_instructions_merges() {
        let mut cart = Cart::new();
        let burger = item("burger", 45);
        cart.add(&burger, 2, None).unwrap();
        cart.add(&burger, 1, Some("")).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.lines()[0].line_total(), Decimal::from(135));
    }

    #[test]
    fn test_different_instructions_stay_distinct() {
        let mut cart = Cart::new();
        let burger = item("burger", 45);
        cart.add(&burger, 1, Some("no onion")).unwrap();
        cart.add(&burger, 1, Some("")).unwrap();

        assert_eq!(cart.lines().len(), 2);
        assert_ne!(cart.lines()[0].line_id, cart.lines()[1].line_id);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add(&item("burger", 45), 2, None).unwrap();
        cart.add(&item("juice", 15), 1, None).unwrap();

        assert_eq!(cart.total_amount(), Decimal::from(105));
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_update_to_zero_removes_line() {
        let mut cart = Cart::new();
        let line_id = cart.add(&item("burger", 45), 1, None).unwrap().line_id.clone();

        cart.update_line(&line_id, 0).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_update_sets_quantity_without_merging() {
        let mut cart = Cart::new();
        let burger = item("burger", 45);
        let first = cart.add(&burger, 1, Some("no onion")).unwrap().line_id.clone();
        cart.add(&burger, 1, None).unwrap();

        cart.update_line(&first, 4).unwrap();
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].quantity, 4);
        assert_eq!(cart.total_amount(), Decimal::from(225));
    }

    #[test]
    fn test_update_negative_removes_and_unknown_line_fails() {
        let mut cart = Cart::new();
        let line_id = cart.add(&item("burger", 45), 3, None).unwrap().line_id.clone();

        assert_eq!(
            cart.update_line("missing", 1),
            Err(CartError::LineNotFound("missing".to_string()))
        );
        cart.update_line(&line_id, -2).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_zero_quantity_and_unavailable_rejected() {
        let mut cart = Cart::new();
        let mut soup = item("soup", 20);
        assert_eq!(cart.add(&soup, 0, None), Err(CartError::InvalidQuantity));

        soup.is_available = false;
        assert_eq!(
            cart.add(&soup, 1, None),
            Err(CartError::ItemUnavailable("soup".to_string()))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_price_is_snapshotted() {
        let mut cart = Cart::new();
        let mut burger = item("burger", 45);
        cart.add(&burger, 1, None).unwrap();

        burger.price = Decimal::from(99);
        cart.add(&burger, 1, None).unwrap();
        assert_eq!(cart.lines()[0].price, Decimal::from(45));
        assert_eq!(cart.total_amount(), Decimal::from(90));
    }

    #[test]
    fn test_quantity_upper_bound() {
        let mut cart = Cart::new();
        let burger = item("burger", 45);
        assert_eq!(
            cart.add(&burger, MAX_LINE_QUANTITY + 1, None),
            Err(CartError::InvalidQuantity)
        );

        let first = cart.add(&burger, 90, None).unwrap().line_id.clone();
        assert_eq!(cart.add(&burger, 10, None), Err(CartError::InvalidQuantity));
        assert_eq!(cart.lines()[0].quantity, 90);

        let second = cart
            .add(&burger, 1, Some("extra cheese"))
            .unwrap()
            .line_id
            .clone();
        for line_id in [&first, &second] {
            assert_eq!(
                cart.update_line(line_id, i64::from(u32::MAX)),
                Err(CartError::InvalidQuantity)
            );
            cart.update_line(line_id, i64::from(MAX_LINE_QUANTITY)).unwrap();
        }
        assert_eq!(cart.total_items(), 2 * MAX_LINE_QUANTITY);
        assert_eq!(cart.total_amount(), Decimal::from(45 * 2 * 99));
    }

    #[test]
    fn test_remove_line() {
        let mut cart = Cart::new();
        let line_id = cart.add(&item("burger", 45), 1, None).unwrap().line_id.clone();
        assert!(!cart.remove_line("missing"));
        assert!(cart.remove_line(&line_id));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_error_codes() {
        let err: AppError = CartError::LineNotFound("x".into()).into();
        assert_eq!(err.code, ErrorCode::CartLineNotFound);
        let err: AppError = CartError::InvalidQuantity.into();
        assert_eq!(err.code, ErrorCode::InvalidQuantity);
    }
}
