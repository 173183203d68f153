//! Catalog loading
//!
//! Restaurant, categories and items are read concurrently; the category and
//! item reads are unscoped, so the result is joined by restaurant id here.
//! The table read waits for the restaurant. Any failure degrades to the
//! demo catalog, tagged [`CatalogSource::Fallback`].

use std::sync::Arc;

use shared::models::{DiningTable, MenuCategory, MenuItem, Restaurant};

use super::{Catalog, CatalogSource, MenuError, fixtures};
use crate::gateway::{DataGateway, Query, Table};

/// Table id used when the QR link carries none
pub const DEFAULT_TABLE_ID: &str = "1";

#[derive(Clone)]
pub struct CatalogLoader {
    gateway: Arc<dyn DataGateway>,
}

impl CatalogLoader {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self { gateway }
    }

    /// Always yields a usable catalog
    pub async fn load(&self, slug: Option<&str>, table_id: Option<&str>) -> Catalog {
        match self.load_live(slug, table_id).await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(
                    slug = slug.unwrap_or("-"),
                    table = table_id.unwrap_or("-"),
                    error = %e,
                    "Catalog load failed, serving demo catalog"
                );
                fixtures::demo_catalog()
            }
        }
    }

    pub async fn load_live(
        &self,
        slug: Option<&str>,
        table_id: Option<&str>,
    ) -> Result<Catalog, MenuError> {
        let mut restaurant_query = Query::from(Table::Restaurants).eq("is_active", true);
        if let Some(slug) = slug.map(str::trim).filter(|s| !s.is_empty()) {
            restaurant_query = restaurant_query.eq("slug", slug);
        }
        let restaurant_query = restaurant_query.limit(1);
        let categories_query = Query::from(Table::MenuCategories)
            .eq("is_active", true)
            .order("display_order", true);
        let items_query = Query::from(Table::MenuItems).order("name", true);

        let (restaurant, categories, items) = tokio::join!(
            self.gateway.maybe_single::<Restaurant>(&restaurant_query),
            self.gateway.many::<MenuCategory>(&categories_query),
            self.gateway.many::<MenuItem>(&items_query),
        );
        let restaurant = restaurant?.ok_or(MenuError::RestaurantNotFound)?;

        let mut categories: Vec<MenuCategory> = categories?
            .into_iter()
            .filter(|c| c.restaurant_id == restaurant.id)
            .collect();
        categories.sort_by_key(|c| c.display_order);

        let items: Vec<MenuItem> = items?
            .into_iter()
            .filter(|i| i.restaurant_id == restaurant.id)
            .collect();

        let table = self.resolve_table(&restaurant, table_id).await?;

        tracing::debug!(
            restaurant = %restaurant.slug,
            table = %table.id,
            categories = categories.len(),
            items = items.len(),
            "Catalog loaded"
        );

        Ok(Catalog {
            restaurant,
            table,
            categories,
            items,
            source: CatalogSource::Live,
        })
    }

    async fn resolve_table(
        &self,
        restaurant: &Restaurant,
        table_id: Option<&str>,
    ) -> Result<DiningTable, MenuError> {
        let Some(table_id) = table_id.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(DiningTable::placeholder(DEFAULT_TABLE_ID, &restaurant.id));
        };

        let query = Query::from(Table::Tables)
            .eq("id", table_id)
            .eq("restaurant_id", restaurant.id.as_str())
            .limit(1);
        let table: Option<DiningTable> = self.gateway.maybe_single(&query).await?;
        Ok(table.unwrap_or_else(|| DiningTable::placeholder(table_id, &restaurant.id)))
    }
}
