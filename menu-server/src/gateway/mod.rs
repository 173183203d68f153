//! Remote data gateway
//!
//! The hosted relational store is an opaque request/response API. Everything
//! in the server talks to it through [`DataGateway`]:
//!
//! | Verb | Meaning |
//! |------|---------|
//! | `select` | equality filters, ordering, limit |
//! | `insert` | returns the inserted row |
//! | `update` | by filter, returns the updated rows |
//! | `submit_order` | insert order + mark table occupied, atomically |
//!
//! Raw rows are JSON; the typed helpers on `dyn DataGateway` decode them into
//! `shared::models` types and reject rows that do not fit.

pub mod error;
pub mod memory;
pub mod rest;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::models::{NewOrder, Order};

pub use error::GatewayError;
pub use memory::MemoryGateway;
pub use rest::{RestGateway, RestGatewayConfig};

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Tables exposed by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Restaurants,
    MenuCategories,
    MenuItems,
    Tables,
    Orders,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Restaurants => "restaurants",
            Table::MenuCategories => "menu_categories",
            Table::MenuItems => "menu_items",
            Table::Tables => "tables",
            Table::Orders => "orders",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

/// Select/update filter: equality predicates, ordering, limit
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: Table,
    pub filters: Vec<(String, Value)>,
    pub order: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn from(table: Table) -> Self {
        Self {
            table,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push((column.to_string(), value.into()));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some(OrderBy {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
pub trait DataGateway: Send + Sync {
    async fn select(&self, query: &Query) -> GatewayResult<Vec<Value>>;

    async fn insert(&self, table: Table, row: Value) -> GatewayResult<Value>;

    async fn update(&self, query: &Query, patch: Value) -> GatewayResult<Vec<Value>>;

    /// Persist an order and mark its table occupied as one step.
    ///
    /// A table id that does not exist in the store is not an error; the
    /// order is still recorded.
    async fn submit_order(&self, order: &NewOrder) -> GatewayResult<Order>;

    /// Whether this gateway serves built-in demo data
    fn is_demo(&self) -> bool {
        false
    }
}

/// Decode one raw row into a typed model
pub fn decode_row<T: DeserializeOwned>(table: Table, row: Value) -> GatewayResult<T> {
    serde_json::from_value(row).map_err(|e| GatewayError::Malformed {
        table,
        message: e.to_string(),
    })
}

fn encode_row<T: Serialize>(table: Table, row: &T) -> GatewayResult<Value> {
    serde_json::to_value(row).map_err(|e| GatewayError::Malformed {
        table,
        message: e.to_string(),
    })
}

// Typed helpers. Cardinality follows the store's conventions: `many`,
// `single` (exactly one) and `maybe_single` (zero or one).
impl dyn DataGateway {
    pub async fn many<T: DeserializeOwned>(&self, query: &Query) -> GatewayResult<Vec<T>> {
        self.select(query)
            .await?
            .into_iter()
            .map(|row| decode_row(query.table, row))
            .collect()
    }

    pub async fn single<T: DeserializeOwned>(&self, query: &Query) -> GatewayResult<T> {
        let mut rows = self.select(query).await?;
        if rows.len() != 1 {
            return Err(GatewayError::Cardinality {
                table: query.table,
                count: rows.len(),
            });
        }
        decode_row(query.table, rows.remove(0))
    }

    pub async fn maybe_single<T: DeserializeOwned>(
        &self,
        query: &Query,
    ) -> GatewayResult<Option<T>> {
        let mut rows = self.select(query).await?;
        match rows.len() {
            0 => Ok(None),
            1 => decode_row(query.table, rows.remove(0)).map(Some),
            count => Err(GatewayError::Cardinality {
                table: query.table,
                count,
            }),
        }
    }

    pub async fn insert_as<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        table: Table,
        row: &B,
    ) -> GatewayResult<T> {
        let row = encode_row(table, row)?;
        let inserted = self.insert(table, row).await?;
        decode_row(table, inserted)
    }

    pub async fn update_as<T: DeserializeOwned>(
        &self,
        query: &Query,
        patch: Value,
    ) -> GatewayResult<Vec<T>> {
        self.update(query, patch)
            .await?
            .into_iter()
            .map(|row| decode_row(query.table, row))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::models::MenuCategory;

    #[test]
    fn test_query_builder() {
        let q = Query::from(Table::Users)
            .eq("email", "a@b.c")
            .eq("is_active", true)
            .order("created_at", false)
            .limit(1);
        assert_eq!(q.filters.len(), 2);
        assert_eq!(q.filters[1], ("is_active".to_string(), json!(true)));
        assert_eq!(q.order.as_ref().unwrap().column, "created_at");
        assert_eq!(q.limit, Some(1));
    }

    #[test]
    fn test_decode_row_rejects_malformed() {
        let ok: MenuCategory = decode_row(
            Table::MenuCategories,
            json!({"id": "c1", "restaurant_id": "r1", "name": "Drinks", "display_order": 2, "is_active": true}),
        )
        .unwrap();
        assert_eq!(ok.name, "Drinks");

        let err = decode_row::<MenuCategory>(
            Table::MenuCategories,
            json!({"id": "c1", "name": 42}),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Malformed {
                table: Table::MenuCategories,
                ..
            }
        ));
    }
}
