//! Restaurant onboarding
//!
//! Registration creates the tenant and its first `restaurant_admin` in one
//! call. The store offers no transaction across the two inserts, so a failed
//! admin sign-up deactivates the freshly created restaurant.

use std::sync::Arc;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{DiningTable, Restaurant, RestaurantCreate, Role, SignUp};
use shared::util::{new_id, slugify};
use thiserror::Error;

use crate::auth::{AuthError, AuthService, AuthSession};
use crate::gateway::{DataGateway, GatewayError, Query, Table};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text,
    validate_password, validate_required_text,
};

/// Slug candidates tried before giving up
const MAX_SLUG_ATTEMPTS: u32 = 50;

#[derive(Debug, Error)]
pub enum RestaurantError {
    #[error(transparent)]
    Validation(AppError),

    #[error("Restaurant not found")]
    NotFound,

    #[error("No free slug for {0}")]
    SlugExhausted(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Invalid public base URL: {0}")]
    InvalidBaseUrl(String),
}

impl From<RestaurantError> for AppError {
    fn from(err: RestaurantError) -> Self {
        match err {
            RestaurantError::Validation(e) => e,
            RestaurantError::NotFound => AppError::new(ErrorCode::RestaurantNotFound),
            RestaurantError::SlugExhausted(slug) => {
                AppError::already_exists(format!("Restaurant slug {slug}"))
            }
            RestaurantError::Auth(e) => e.into(),
            RestaurantError::Gateway(e) => {
                AppError::with_message(ErrorCode::RegistrationFailed, e.user_message())
            }
            RestaurantError::InvalidBaseUrl(msg) => {
                AppError::with_message(ErrorCode::ConfigError, msg)
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRestaurant {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub admin_full_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl RegisterRestaurant {
    fn validate(&self) -> Result<(), AppError> {
        validate_required_text(&self.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&self.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            validate_email(email)?;
        }
        validate_optional_text(&self.address, "address", MAX_ADDRESS_LEN)?;
        validate_required_text(&self.admin_full_name, "admin_full_name", MAX_NAME_LEN)?;
        validate_email(&self.admin_email)?;
        validate_password(&self.admin_password)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub restaurant: Restaurant,
    pub session: AuthSession,
}

/// A table and the URL its QR code points at
#[derive(Debug, Clone, Serialize)]
pub struct TableLink {
    pub table: DiningTable,
    pub url: String,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct RestaurantService {
    gateway: Arc<dyn DataGateway>,
    auth: AuthService,
    public_base_url: String,
}

impl RestaurantService {
    pub fn new(
        gateway: Arc<dyn DataGateway>,
        auth: AuthService,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            auth,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn slug_taken(&self, slug: &str) -> Result<bool, GatewayError> {
        let query = Query::from(Table::Restaurants).eq("slug", slug).limit(1);
        Ok(!self.gateway.select(&query).await?.is_empty())
    }

    async fn insert_restaurant(
        &self,
        data: &RegisterRestaurant,
    ) -> Result<Restaurant, RestaurantError> {
        let base = slugify(&data.name);
        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let slug = if attempt == 1 {
                base.clone()
            } else {
                format!("{base}-{attempt}")
            };
            if self.slug_taken(&slug).await? {
                continue;
            }

            let row = Restaurant::new(
                new_id(),
                RestaurantCreate {
                    name: data.name.trim().to_string(),
                    slug: slug.clone(),
                    phone: blank_to_none(data.phone.clone()),
                    email: blank_to_none(data.email.clone()),
                    address: blank_to_none(data.address.clone()),
                },
            );
            match self.gateway.insert_as::<Restaurant, _>(Table::Restaurants, &row).await {
                Ok(restaurant) => return Ok(restaurant),
                // Lost a race for this slug; try the next one
                Err(e) if e.is_conflict() => {
                    tracing::debug!(slug = %slug, "Slug taken on insert, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(RestaurantError::SlugExhausted(base))
    }

    pub async fn register(&self, data: RegisterRestaurant) -> Result<Registration, RestaurantError> {
        data.validate().map_err(RestaurantError::Validation)?;

        let restaurant = self.insert_restaurant(&data).await?;
        tracing::info!(restaurant_id = %restaurant.id, slug = %restaurant.slug, "Restaurant created");

        let sign_up = SignUp {
            email: data.admin_email,
            password: data.admin_password,
            full_name: data.admin_full_name,
            role: Role::RestaurantAdmin,
            restaurant_id: Some(restaurant.id.clone()),
        };
        match self.auth.sign_up(sign_up).await {
            Ok(session) => Ok(Registration {
                restaurant,
                session,
            }),
            Err(e) => {
                tracing::warn!(
                    restaurant_id = %restaurant.id,
                    error = %e,
                    "Admin sign-up failed, deactivating restaurant"
                );
                let query = Query::from(Table::Restaurants).eq("id", restaurant.id.as_str());
                if let Err(rollback) = self.gateway.update(&query, json!({ "is_active": false })).await
                {
                    tracing::error!(
                        restaurant_id = %restaurant.id,
                        error = %rollback,
                        "Failed to deactivate orphaned restaurant"
                    );
                }
                Err(e.into())
            }
        }
    }

    pub fn menu_url(&self, slug: &str, table_id: &str) -> Result<String, RestaurantError> {
        let url = Url::parse_with_params(
            &format!("{}/menu", self.public_base_url),
            &[("restaurant", slug), ("table", table_id)],
        )
        .map_err(|e| RestaurantError::InvalidBaseUrl(e.to_string()))?;
        Ok(url.to_string())
    }

    /// Every table of a restaurant with its QR target
    pub async fn table_links(&self, restaurant_id: &str) -> Result<Vec<TableLink>, RestaurantError> {
        let query = Query::from(Table::Restaurants)
            .eq("id", restaurant_id)
            .limit(1);
        let restaurant: Restaurant = self
            .gateway
            .maybe_single(&query)
            .await?
            .ok_or(RestaurantError::NotFound)?;

        let query = Query::from(Table::Tables)
            .eq("restaurant_id", restaurant_id)
            .order("label", true);
        let tables: Vec<DiningTable> = self.gateway.many(&query).await?;

        tables
            .into_iter()
            .map(|table| {
                let url = self.menu_url(&restaurant.slug, &table.id)?;
                Ok(TableLink { table, url })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{JwtConfig, JwtService};
    use crate::gateway::MemoryGateway;
    use crate::menu::fixtures::{DEMO_RESTAURANT_ID, demo_restaurant, demo_table};

    fn service() -> (Arc<MemoryGateway>, RestaurantService) {
        let gateway = Arc::new(MemoryGateway::new());
        let jwt = Arc::new(JwtService::new(JwtConfig::new(
            "test-secret-key-at-least-32-bytes!!",
            60,
        )));
        let auth = AuthService::new(gateway.clone(), jwt);
        let service = RestaurantService::new(gateway.clone(), auth, "https://menu.example.com/");
        (gateway, service)
    }

    fn request(name: &str, admin_email: &str) -> RegisterRestaurant {
        RegisterRestaurant {
            name: name.to_string(),
            phone: Some("0500000000".to_string()),
            email: None,
            address: Some("  ".to_string()),
            admin_full_name: "Owner".to_string(),
            admin_email: admin_email.to_string(),
            admin_password: "owner123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_creates_tenant_and_admin() {
        let (gateway, service) = service();
        let reg = service
            .register(request("Le Petit Bistro", "owner@bistro.com"))
            .await
            .unwrap();

        assert_eq!(reg.restaurant.slug, "le-petit-bistro");
        assert_eq!(reg.restaurant.subscription_status, "trial");
        assert_eq!(reg.restaurant.subscription_plan, "basic");
        assert_eq!(reg.restaurant.address, None);
        assert_eq!(reg.session.user.role, Role::RestaurantAdmin);
        assert_eq!(
            reg.session.user.restaurant_id.as_deref(),
            Some(reg.restaurant.id.as_str())
        );
        assert_eq!(gateway.rows(Table::Users).len(), 1);
    }

    #[tokio::test]
    async fn test_slug_gets_numeric_suffix() {
        let (_, service) = service();
        service.register(request("Bistro", "a@bistro.com")).await.unwrap();
        let second = service.register(request("Bistro!", "b@bistro.com")).await.unwrap();
        let third = service.register(request("bistro", "c@bistro.com")).await.unwrap();
        assert_eq!(second.restaurant.slug, "bistro-2");
        assert_eq!(third.restaurant.slug, "bistro-3");
    }

    #[tokio::test]
    async fn test_failed_admin_deactivates_restaurant() {
        let (gateway, service) = service();
        service.register(request("Bistro", "owner@bistro.com")).await.unwrap();

        let err = service
            .register(request("Other Place", "OWNER@bistro.com"))
            .await
            .unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::RegistrationFailed);

        let orphan = gateway
            .rows(Table::Restaurants)
            .into_iter()
            .find(|r| r["slug"] == "other-place")
            .unwrap();
        assert_eq!(orphan["is_active"], false);
    }

    #[tokio::test]
    async fn test_validation_happens_before_insert() {
        let (gateway, service) = service();
        let mut bad = request("Bistro", "owner@bistro.com");
        bad.admin_password = "123".into();
        let app: AppError = service.register(bad).await.unwrap_err().into();
        assert_eq!(app.code, ErrorCode::PasswordTooShort);

        let app: AppError = service
            .register(request("   ", "owner@bistro.com"))
            .await
            .unwrap_err()
            .into();
        assert_eq!(app.code, ErrorCode::RequiredField);
        assert!(gateway.rows(Table::Restaurants).is_empty());
    }

    #[tokio::test]
    async fn test_table_links() {
        let (gateway, service) = service();
        gateway.seed(Table::Restaurants, &[demo_restaurant()]);
        gateway.seed(Table::Tables, &[demo_table()]);

        let links = service.table_links(DEMO_RESTAURANT_ID).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(
            links[0].url,
            "https://menu.example.com/menu?restaurant=demo&table=demo-table-1"
        );

        assert!(matches!(
            service.table_links("nope").await,
            Err(RestaurantError::NotFound)
        ));
    }
}
