//! Built-in demo data
//!
//! One restaurant, one table, three categories, three items. Served as the
//! degraded-mode catalog whenever a live load fails, and seeded into the
//! in-memory gateway when no store is configured.

use rust_decimal::Decimal;
use serde_json::Value;
use shared::models::{
    DiningTable, MenuCategory, MenuItem, Restaurant, Role, SignUp, TableStatus,
};

use super::{Catalog, CatalogSource};
use crate::auth::AuthError;
use crate::auth::service::NewUserRow;
use crate::gateway::{DataGateway, MemoryGateway, Table};

pub const DEMO_RESTAURANT_ID: &str = "demo-restaurant";
pub const DEMO_RESTAURANT_SLUG: &str = "demo";
pub const DEMO_TABLE_ID: &str = "demo-table-1";

pub fn demo_restaurant() -> Restaurant {
    Restaurant {
        id: DEMO_RESTAURANT_ID.into(),
        name: "Demo Restaurant".into(),
        slug: DEMO_RESTAURANT_SLUG.into(),
        phone: Some("+966 11 000 0000".into()),
        email: Some("hello@demo-restaurant.com".into()),
        address: Some("1 Demo Street".into()),
        theme: Value::Object(Default::default()),
        subscription_status: "trial".into(),
        subscription_plan: "basic".into(),
        is_active: true,
    }
}

pub fn demo_table() -> DiningTable {
    DiningTable {
        id: DEMO_TABLE_ID.into(),
        restaurant_id: DEMO_RESTAURANT_ID.into(),
        label: "1".into(),
        is_active: true,
        status: TableStatus::Available,
    }
}

pub fn demo_categories() -> Vec<MenuCategory> {
    [("demo-cat-starters", "Starters", 1), ("demo-cat-mains", "Main Courses", 2), ("demo-cat-drinks", "Drinks", 3)]
        .into_iter()
        .map(|(id, name, display_order)| MenuCategory {
            id: id.into(),
            restaurant_id: DEMO_RESTAURANT_ID.into(),
            name: name.into(),
            display_order,
            is_active: true,
        })
        .collect()
}

pub fn demo_items() -> Vec<MenuItem> {
    let item = |id: &str, category_id: &str, name: &str, description: &str, price: i64, minutes: i32| {
        MenuItem {
            id: id.into(),
            restaurant_id: DEMO_RESTAURANT_ID.into(),
            category_id: category_id.into(),
            name: name.into(),
            description: description.into(),
            price: Decimal::from(price),
            is_available: true,
            preparation_time: Some(minutes),
            image_url: None,
        }
    };
    vec![
        item("demo-item-hummus", "demo-cat-starters", "Hummus", "Chickpeas, tahini, olive oil", 25, 5),
        item("demo-item-burger", "demo-cat-mains", "Classic Burger", "Beef patty, cheddar, pickles", 45, 15),
        item("demo-item-juice", "demo-cat-drinks", "Orange Juice", "Freshly squeezed", 15, 3),
    ]
}

/// The degraded-mode catalog
pub fn demo_catalog() -> Catalog {
    Catalog {
        restaurant: demo_restaurant(),
        table: demo_table(),
        categories: demo_categories(),
        items: demo_items(),
        source: CatalogSource::Fallback,
    }
}

/// Demo staff accounts (email, password, name, role)
pub const DEMO_STAFF: &[(&str, &str, &str, Role)] = &[
    ("admin@restaurant.com", "admin123", "Demo Admin", Role::RestaurantAdmin),
    ("cashier@restaurant.com", "cashier123", "Demo Cashier", Role::Cashier),
    ("chef@restaurant.com", "chef123", "Demo Chef", Role::Chef),
];

/// Fill an in-memory gateway with the demo tenant and its staff
pub async fn seed_demo(gateway: &MemoryGateway) -> Result<(), AuthError> {
    gateway.seed(Table::Restaurants, &[demo_restaurant()]);
    gateway.seed(Table::Tables, &[demo_table()]);
    gateway.seed(Table::MenuCategories, &demo_categories());
    gateway.seed(Table::MenuItems, &demo_items());

    for (email, password, full_name, role) in DEMO_STAFF {
        let row = NewUserRow::new(&SignUp {
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.to_string(),
            role: *role,
            restaurant_id: Some(DEMO_RESTAURANT_ID.to_string()),
        })?;
        let row = serde_json::to_value(&row).map_err(|e| AuthError::Internal(e.to_string()))?;
        gateway.insert(Table::Users, row).await?;
    }

    tracing::info!(
        restaurant = DEMO_RESTAURANT_SLUG,
        staff = DEMO_STAFF.len(),
        "Demo data seeded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_catalog_shape() {
        let catalog = demo_catalog();
        assert_eq!(catalog.source, CatalogSource::Fallback);
        assert_eq!(catalog.categories.len(), 3);
        assert_eq!(catalog.items.len(), 3);
        for item in &catalog.items {
            assert!(catalog.categories.iter().any(|c| c.id == item.category_id));
        }
    }

    #[tokio::test]
    async fn test_seed_demo() {
        let gateway = MemoryGateway::demo();
        seed_demo(&gateway).await.unwrap();
        assert_eq!(gateway.rows(Table::Users).len(), DEMO_STAFF.len());
        assert_eq!(gateway.rows(Table::MenuItems).len(), 3);
        assert!(gateway.is_demo());
    }
}
