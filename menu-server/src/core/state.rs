//! Application state
//!
//! Every service a handler needs, cloned cheaply into each request.
//!
//! | Field | Purpose |
//! |-------|---------|
//! | config | immutable configuration |
//! | gateway | remote store, or in-memory demo data |
//! | jwt | session token codec |
//! | auth | sign-in / sign-up / token resolution |
//! | catalog | QR menu loader |
//! | menu_sessions | live customer sessions |
//! | submitter | checkout |
//! | restaurants | onboarding and QR links |

use std::sync::Arc;

use super::{Config, Result};
use crate::auth::{AuthService, JwtConfig, JwtService};
use crate::gateway::{DataGateway, MemoryGateway, RestGateway, RestGatewayConfig};
use crate::menu::{CatalogLoader, MenuSessions, fixtures};
use crate::orders::{OrderBoard, OrderSubmitter};
use crate::restaurants::RestaurantService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: Arc<dyn DataGateway>,
    pub jwt: Arc<JwtService>,
    pub auth: AuthService,
    pub catalog: CatalogLoader,
    pub menu_sessions: Arc<MenuSessions>,
    pub submitter: OrderSubmitter,
    pub restaurants: RestaurantService,
}

impl AppState {
    /// Build state from configuration
    ///
    /// Without `GATEWAY_URL` the server runs on a seeded in-memory store.
    pub async fn new(config: &Config) -> Result<Self> {
        let gateway: Arc<dyn DataGateway> = match &config.gateway_url {
            Some(url) => {
                tracing::info!(url = %url, "Using remote data gateway");
                Arc::new(RestGateway::new(RestGatewayConfig {
                    base_url: url.clone(),
                    api_key: config.gateway_key.clone(),
                    timeout: config.gateway_timeout(),
                })?)
            }
            None => {
                tracing::warn!("GATEWAY_URL not set, running in demo mode with built-in data");
                let memory = MemoryGateway::demo();
                fixtures::seed_demo(&memory).await?;
                Arc::new(memory)
            }
        };
        Ok(Self::with_gateway(config.clone(), gateway))
    }

    /// Build state over an existing gateway
    pub fn with_gateway(config: Config, gateway: Arc<dyn DataGateway>) -> Self {
        let jwt = Arc::new(JwtService::new(JwtConfig::new(
            config.jwt_secret.clone(),
            config.jwt_expiration_minutes,
        )));
        let auth = AuthService::new(gateway.clone(), jwt.clone());
        let restaurants =
            RestaurantService::new(gateway.clone(), auth.clone(), config.public_base_url.clone());

        Self {
            catalog: CatalogLoader::new(gateway.clone()),
            menu_sessions: Arc::new(MenuSessions::new(config.menu_session_idle())),
            submitter: OrderSubmitter::new(gateway.clone()),
            config: Arc::new(config),
            gateway,
            jwt,
            auth,
            restaurants,
        }
    }

    /// Order board scoped to one restaurant
    pub fn order_board(&self, restaurant_id: &str) -> OrderBoard {
        OrderBoard::new(self.gateway.clone(), restaurant_id)
    }

    pub fn is_demo(&self) -> bool {
        self.gateway.is_demo()
    }
}
