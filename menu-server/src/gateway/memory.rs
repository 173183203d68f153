//! In-process gateway
//!
//! Serves demo mode (no store configured) and tests. Rows live in one
//! `RwLock`ed map so `submit_order` can write both tables under a single
//! lock. Unique constraints mirror the hosted schema: `users.email` and
//! `restaurants.slug`. Faults can be injected per table or globally.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{Map, Value};
use shared::models::{NewOrder, Order};
use shared::util::new_id;

use super::{DataGateway, GatewayError, GatewayResult, Query, Table, decode_row};

#[derive(Debug, Default)]
pub struct MemoryGateway {
    tables: RwLock<HashMap<Table, Vec<Value>>>,
    failing: RwLock<HashSet<Table>>,
    offline: AtomicBool,
    demo: bool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty gateway flagged as demo data
    pub fn demo() -> Self {
        Self {
            demo: true,
            ..Self::default()
        }
    }

    /// Load raw rows without constraint checks
    pub fn seed<T: Serialize>(&self, table: Table, rows: &[T]) {
        let mut tables = self.tables.write();
        let target = tables.entry(table).or_default();
        for row in rows {
            match serde_json::to_value(row) {
                Ok(value) => target.push(value),
                Err(e) => tracing::warn!(%table, error = %e, "Skipping unserializable seed row"),
            }
        }
    }

    /// Snapshot of a table's rows
    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.tables.read().get(&table).cloned().unwrap_or_default()
    }

    /// Every call fails with a transport error while set
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, AtomicOrdering::SeqCst);
    }

    /// Calls touching `table` fail until [`restore_table`](Self::restore_table)
    pub fn fail_table(&self, table: Table) {
        self.failing.write().insert(table);
    }

    pub fn restore_table(&self, table: Table) {
        self.failing.write().remove(&table);
    }

    fn check(&self, table: Table) -> GatewayResult<()> {
        if self.offline.load(AtomicOrdering::SeqCst) {
            return Err(GatewayError::Transport("connection refused".to_string()));
        }
        if self.failing.read().contains(&table) {
            return Err(GatewayError::Rejected {
                status: 503,
                message: format!("{table} is unavailable"),
            });
        }
        Ok(())
    }
}

fn unique_columns(table: Table) -> &'static [&'static str] {
    match table {
        Table::Users => &["id", "email"],
        Table::Restaurants => &["id", "slug"],
        _ => &["id"],
    }
}

fn matches(row: &Value, filters: &[(String, Value)]) -> bool {
    filters.iter().all(|(column, expected)| match row.get(column) {
        Some(actual) => actual == expected,
        None => expected.is_null(),
    })
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn as_object(table: Table, value: Value) -> GatewayResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(GatewayError::Malformed {
            table,
            message: format!("expected an object, got {other}"),
        }),
    }
}

fn insert_row(
    tables: &mut HashMap<Table, Vec<Value>>,
    table: Table,
    row: Value,
) -> GatewayResult<Value> {
    let mut row = as_object(table, row)?;
    if row.get("id").is_none_or(Value::is_null) {
        row.insert("id".to_string(), Value::String(new_id()));
    }

    let rows = tables.entry(table).or_default();
    for column in unique_columns(table) {
        let Some(value) = row.get(*column).filter(|v| !v.is_null()) else {
            continue;
        };
        if rows.iter().any(|existing| existing.get(*column) == Some(value)) {
            return Err(GatewayError::Rejected {
                status: 409,
                message: format!(
                    "duplicate key value violates unique constraint \"{}_{}_key\"",
                    table, column
                ),
            });
        }
    }

    let row = Value::Object(row);
    rows.push(row.clone());
    Ok(row)
}

#[async_trait]
impl DataGateway for MemoryGateway {
    async fn select(&self, query: &Query) -> GatewayResult<Vec<Value>> {
        self.check(query.table)?;
        let tables = self.tables.read();
        let mut rows: Vec<Value> = tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches(row, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ord = compare_values(a.get(&order.column), b.get(&order.column));
                if order.ascending { ord } else { ord.reverse() }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn insert(&self, table: Table, row: Value) -> GatewayResult<Value> {
        self.check(table)?;
        let mut tables = self.tables.write();
        insert_row(&mut tables, table, row)
    }

    async fn update(&self, query: &Query, patch: Value) -> GatewayResult<Vec<Value>> {
        self.check(query.table)?;
        let patch = as_object(query.table, patch)?;
        let mut tables = self.tables.write();
        let mut updated = Vec::new();
        if let Some(rows) = tables.get_mut(&query.table) {
            for row in rows.iter_mut().filter(|row| matches(row, &query.filters)) {
                if let Value::Object(fields) = row {
                    for (key, value) in &patch {
                        fields.insert(key.clone(), value.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn submit_order(&self, order: &NewOrder) -> GatewayResult<Order> {
        self.check(Table::Orders)?;
        self.check(Table::Tables)?;

        let row = serde_json::to_value(order).map_err(|e| GatewayError::Malformed {
            table: Table::Orders,
            message: e.to_string(),
        })?;

        let mut tables = self.tables.write();
        let inserted = insert_row(&mut tables, Table::Orders, row)?;
        if let Some(rows) = tables.get_mut(&Table::Tables) {
            let filters = [
                ("id".to_string(), Value::String(order.table_id.clone())),
                (
                    "restaurant_id".to_string(),
                    Value::String(order.restaurant_id.clone()),
                ),
            ];
            for row in rows.iter_mut().filter(|row| matches(row, &filters)) {
                if let Value::Object(fields) = row {
                    fields.insert("status".to_string(), Value::String("occupied".into()));
                }
            }
        }
        drop(tables);

        decode_row(Table::Orders, inserted)
    }

    fn is_demo(&self) -> bool {
        self.demo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;
    use shared::models::{DiningTable, OrderStatus, TableStatus};

    fn gateway() -> MemoryGateway {
        let gw = MemoryGateway::new();
        gw.seed(
            Table::Tables,
            &[DiningTable {
                id: "t1".into(),
                restaurant_id: "r1".into(),
                label: "1".into(),
                is_active: true,
                status: TableStatus::Available,
            }],
        );
        gw
    }

    fn new_order(table_id: &str) -> NewOrder {
        NewOrder {
            restaurant_id: "r1".into(),
            table_id: table_id.into(),
            customer_name: "Sara".into(),
            customer_phone: None,
            items: vec![],
            total_amount: Decimal::from(10),
            notes: None,
            status: OrderStatus::New,
            created_at: 1,
        }
    }

    #[tokio::test]
    async fn test_select_filters_orders_and_limits() {
        let gw = MemoryGateway::new();
        gw.seed(
            Table::MenuCategories,
            &[
                json!({"id": "a", "restaurant_id": "r1", "display_order": 3}),
                json!({"id": "b", "restaurant_id": "r1", "display_order": 1}),
                json!({"id": "c", "restaurant_id": "r2", "display_order": 2}),
            ],
        );
        let rows = gw
            .select(
                &Query::from(Table::MenuCategories)
                    .eq("restaurant_id", "r1")
                    .order("display_order", true),
            )
            .await
            .unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        let rows = gw
            .select(&Query::from(Table::MenuCategories).order("display_order", false).limit(1))
            .await
            .unwrap();
        assert_eq!(rows[0]["id"], "a");
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_enforces_unique_email() {
        let gw = MemoryGateway::new();
        let row = gw
            .insert(Table::Users, json!({"email": "a@b.c"}))
            .await
            .unwrap();
        assert!(row["id"].is_string());

        let err = gw
            .insert(Table::Users, json!({"email": "a@b.c"}))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert!(err.user_message().contains("users_email_key"));
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let gw = gateway();
        let updated = gw
            .update(
                &Query::from(Table::Tables).eq("id", "t1"),
                json!({"status": "occupied"}),
            )
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0]["status"], "occupied");
        assert_eq!(updated[0]["label"], "1");
    }

    #[tokio::test]
    async fn test_submit_order_marks_table_occupied() {
        let gw = gateway();
        let order = gw.submit_order(&new_order("t1")).await.unwrap();
        assert_eq!(order.table_id, "t1");
        assert_eq!(gw.rows(Table::Orders).len(), 1);
        assert_eq!(gw.rows(Table::Tables)[0]["status"], "occupied");
    }

    #[tokio::test]
    async fn test_submit_order_unknown_table_still_records() {
        let gw = gateway();
        gw.submit_order(&new_order("placeholder")).await.unwrap();
        assert_eq!(gw.rows(Table::Orders).len(), 1);
        assert_eq!(gw.rows(Table::Tables)[0]["status"], "available");
    }

    #[tokio::test]
    async fn test_submit_order_is_all_or_nothing() {
        let gw = gateway();
        gw.fail_table(Table::Tables);
        assert!(gw.submit_order(&new_order("t1")).await.is_err());
        assert!(gw.rows(Table::Orders).is_empty());

        gw.restore_table(Table::Tables);
        gw.set_offline(true);
        let err = gw.submit_order(&new_order("t1")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}
