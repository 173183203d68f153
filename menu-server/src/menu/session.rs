//! Menu session state machine
//!
//! `Loading → Ready { catalog, active_category, cart }`. Each load is
//! stamped with a generation; a catalog that arrives for an older
//! generation is dropped, so a slow response can never overwrite a newer
//! one.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::cart::{Cart, CartLine};
use shared::models::{DiningTable, MenuCategory, MenuItem, Restaurant};

use super::{Catalog, CatalogSource, MenuError};

/// Proof that a load was started for a given generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct ReadyState {
    pub catalog: Catalog,
    pub active_category: Option<String>,
    pub cart: Cart,
}

#[derive(Debug, Clone)]
pub enum SessionState {
    Loading,
    Ready(Box<ReadyState>),
}

#[derive(Debug, Clone)]
pub struct MenuSession {
    generation: u64,
    state: SessionState,
}

impl Default for MenuSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuSession {
    pub fn new() -> Self {
        Self {
            generation: 0,
            state: SessionState::Loading,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready(_))
    }

    /// Start a (re)load. The session goes back to `Loading` and the cart
    /// is discarded.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = SessionState::Loading;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Apply a loaded catalog. Returns `false` when the ticket is stale.
    pub fn finish_load(&mut self, ticket: LoadTicket, mut catalog: Catalog) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Dropping stale catalog load"
            );
            return false;
        }

        catalog.categories.sort_by_key(|c| c.display_order);
        let active_category = catalog.categories.first().map(|c| c.id.clone());
        self.state = SessionState::Ready(Box::new(ReadyState {
            catalog,
            active_category,
            cart: Cart::new(),
        }));
        true
    }

    pub fn ready(&self) -> Result<&ReadyState, MenuError> {
        match &self.state {
            SessionState::Ready(ready) => Ok(&**ready),
            SessionState::Loading => Err(MenuError::Loading),
        }
    }

    pub fn ready_mut(&mut self) -> Result<&mut ReadyState, MenuError> {
        match &mut self.state {
            SessionState::Ready(ready) => Ok(&mut **ready),
            SessionState::Loading => Err(MenuError::Loading),
        }
    }

    pub fn select_category(&mut self, category_id: &str) -> Result<(), MenuError> {
        let ready = self.ready_mut()?;
        if !ready.catalog.has_category(category_id) {
            return Err(MenuError::CategoryNotFound(category_id.to_string()));
        }
        ready.active_category = Some(category_id.to_string());
        Ok(())
    }

    /// Items of the active category; empty when none is active
    pub fn filtered_items(&self) -> Vec<&MenuItem> {
        let Ok(ready) = self.ready() else {
            return Vec::new();
        };
        match &ready.active_category {
            Some(active) => ready
                .catalog
                .items
                .iter()
                .filter(|i| &i.category_id == active)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn add_to_cart(
        &mut self,
        item_id: &str,
        quantity: u32,
        instructions: Option<&str>,
    ) -> Result<CartLine, MenuError> {
        let ready = self.ready_mut()?;
        let item = ready
            .catalog
            .item(item_id)
            .ok_or_else(|| MenuError::ItemNotFound(item_id.to_string()))?;
        let line = ready.cart.add(item, quantity, instructions)?;
        Ok(line.clone())
    }

    pub fn update_cart_line(&mut self, line_id: &str, quantity: i64) -> Result<(), MenuError> {
        self.ready_mut()?.cart.update_line(line_id, quantity)?;
        Ok(())
    }

    pub fn remove_cart_line(&mut self, line_id: &str) -> Result<bool, MenuError> {
        Ok(self.ready_mut()?.cart.remove_line(line_id))
    }

    pub fn cart(&self) -> Option<&Cart> {
        self.ready().ok().map(|r| &r.cart)
    }

    pub fn total_amount(&self) -> Decimal {
        self.cart().map(Cart::total_amount).unwrap_or_default()
    }

    pub fn total_item_count(&self) -> u32 {
        self.cart().map(Cart::total_items).unwrap_or_default()
    }

    pub fn view(&self) -> MenuSessionView {
        match &self.state {
            SessionState::Loading => MenuSessionView {
                status: "loading",
                ..MenuSessionView::default()
            },
            SessionState::Ready(ready) => MenuSessionView {
                status: "ready",
                source: Some(ready.catalog.source),
                restaurant: Some(ready.catalog.restaurant.clone()),
                table: Some(ready.catalog.table.clone()),
                categories: ready.catalog.categories.clone(),
                active_category: ready.active_category.clone(),
                items: self.filtered_items().into_iter().cloned().collect(),
                cart: ready.cart.lines().to_vec(),
                total_amount: ready.cart.total_amount(),
                total_item_count: ready.cart.total_items(),
            },
        }
    }
}

/// What the menu screen renders
#[derive(Debug, Clone, Default, Serialize)]
pub struct MenuSessionView {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<CatalogSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<Restaurant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<DiningTable>,
    pub categories: Vec<MenuCategory>,
    pub active_category: Option<String>,
    /// Items of the active category
    pub items: Vec<MenuItem>,
    pub cart: Vec<CartLine>,
    pub total_amount: Decimal,
    pub total_item_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::fixtures::demo_catalog;

    fn ready_session() -> MenuSession {
        let mut session = MenuSession::new();
        let ticket = session.begin_load();
        assert!(session.finish_load(ticket, demo_catalog()));
        session
    }

    #[test]
    fn test_loading_rejects_cart_ops() {
        let mut session = MenuSession::new();
        assert!(matches!(
            session.add_to_cart("demo-item-burger", 1, None),
            Err(MenuError::Loading)
        ));
        assert!(session.filtered_items().is_empty());
        assert_eq!(session.view().status, "loading");
    }

    #[test]
    fn test_first_category_by_display_order_is_active() {
        let mut catalog = demo_catalog();
        catalog.categories.reverse();
        let mut session = MenuSession::new();
        let ticket = session.begin_load();
        session.finish_load(ticket, catalog);

        let ready = session.ready().unwrap();
        assert_eq!(ready.active_category.as_deref(), Some("demo-cat-starters"));
        let names: Vec<_> = session.filtered_items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Hummus"]);
    }

    #[test]
    fn test_stale_load_is_ignored() {
        let mut session = MenuSession::new();
        let old = session.begin_load();
        let new = session.begin_load();

        let mut stale = demo_catalog();
        stale.restaurant.name = "Stale".into();
        assert!(session.finish_load(new, demo_catalog()));
        assert!(!session.finish_load(old, stale));
        assert_eq!(session.ready().unwrap().catalog.restaurant.name, "Demo Restaurant");
    }

    #[test]
    fn test_select_category_and_filter() {
        let mut session = ready_session();
        session.select_category("demo-cat-drinks").unwrap();
        let items = session.filtered_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "demo-item-juice");

        assert!(matches!(
            session.select_category("missing"),
            Err(MenuError::CategoryNotFound(_))
        ));
    }

    #[test]
    fn test_cart_flow_and_totals() {
        let mut session = ready_session();
        session.add_to_cart("demo-item-burger", 2, None).unwrap();
        let juice = session.add_to_cart("demo-item-juice", 1, None).unwrap();
        assert_eq!(session.total_amount(), Decimal::from(105));
        assert_eq!(session.total_item_count(), 3);

        session.update_cart_line(&juice.line_id, 0).unwrap();
        assert_eq!(session.total_amount(), Decimal::from(90));
        assert!(!session.remove_cart_line(&juice.line_id).unwrap());

        let view = session.view();
        assert_eq!(view.cart.len(), 1);
        assert_eq!(view.total_amount, Decimal::from(90));
        assert_eq!(view.source, Some(CatalogSource::Fallback));
    }

    #[test]
    fn test_oversized_update_rejected() {
        let mut session = ready_session();
        let burger = session.add_to_cart("demo-item-burger", 1, None).unwrap();
        let juice = session.add_to_cart("demo-item-juice", 1, None).unwrap();

        for line in [&burger, &juice] {
            assert!(matches!(
                session.update_cart_line(&line.line_id, i64::from(u32::MAX)),
                Err(MenuError::Cart(shared::cart::CartError::InvalidQuantity))
            ));
        }
        assert_eq!(session.total_item_count(), 2);
        assert_eq!(session.view().total_item_count, 2);
    }

    #[test]
    fn test_unknown_item_rejected() {
        let mut session = ready_session();
        assert!(matches!(
            session.add_to_cart("ghost", 1, None),
            Err(MenuError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_reload_discards_cart() {
        let mut session = ready_session();
        session.add_to_cart("demo-item-burger", 1, None).unwrap();
        let ticket = session.begin_load();
        assert!(!session.is_ready());
        session.finish_load(ticket, demo_catalog());
        assert_eq!(session.total_item_count(), 0);
    }
}
