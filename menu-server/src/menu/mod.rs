//! Customer menu flow
//!
//! QR scan → [`CatalogLoader`] resolves restaurant, table, and catalog →
//! [`MenuSession`] holds category selection and the cart →
//! checkout goes through [`crate::orders::OrderSubmitter`].

pub mod fixtures;
pub mod loader;
pub mod registry;
pub mod session;

use serde::{Deserialize, Serialize};
use shared::cart::CartError;
use shared::error::{AppError, ErrorCode};
use shared::models::{DiningTable, MenuCategory, MenuItem, Restaurant};
use thiserror::Error;

use crate::gateway::GatewayError;

pub use loader::CatalogLoader;
pub use registry::{MenuSessions, SessionSlot};
pub use session::{LoadTicket, MenuSession, MenuSessionView};

/// Where a catalog came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    Live,
    /// Built-in demo data served because the live load failed
    Fallback,
}

/// Everything the menu screen renders for one restaurant and table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub restaurant: Restaurant,
    pub table: DiningTable,
    /// Sorted by `display_order`
    pub categories: Vec<MenuCategory>,
    pub items: Vec<MenuItem>,
    pub source: CatalogSource,
}

impl Catalog {
    pub fn item(&self, item_id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn has_category(&self, category_id: &str) -> bool {
        self.categories.iter().any(|c| c.id == category_id)
    }
}

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Menu session {0} not found")]
    SessionNotFound(String),

    #[error("Menu is still loading")]
    Loading,

    #[error("Restaurant not found")]
    RestaurantNotFound,

    #[error("Category {0} not found")]
    CategoryNotFound(String),

    #[error("Menu item {0} not found")]
    ItemNotFound(String),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl From<MenuError> for AppError {
    fn from(err: MenuError) -> Self {
        match err {
            MenuError::SessionNotFound(id) => {
                AppError::new(ErrorCode::MenuSessionNotFound).with_detail("session_id", id)
            }
            MenuError::Loading => AppError::new(ErrorCode::MenuSessionLoading),
            MenuError::RestaurantNotFound => AppError::new(ErrorCode::RestaurantNotFound),
            MenuError::CategoryNotFound(id) => {
                AppError::new(ErrorCode::CategoryNotFound).with_detail("category_id", id)
            }
            MenuError::ItemNotFound(id) => {
                AppError::new(ErrorCode::MenuItemNotFound).with_detail("item_id", id)
            }
            MenuError::Cart(e) => e.into(),
            MenuError::Gateway(e) => e.into(),
        }
    }
}
