//! Restaurant Model (one row per tenant)

use serde::{Deserialize, Serialize};

/// Restaurant entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    /// Unique, used in QR menu URLs
    pub slug: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    /// Free-form theming blob (colors, logo, ...) owned by the front end
    #[serde(default)]
    pub theme: serde_json::Value,
    #[serde(default = "default_subscription_status")]
    pub subscription_status: String,
    #[serde(default = "default_subscription_plan")]
    pub subscription_plan: String,
    pub is_active: bool,
}

fn default_subscription_status() -> String {
    "trial".to_string()
}

fn default_subscription_plan() -> String {
    "basic".to_string()
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub slug: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl Restaurant {
    /// Build a new active restaurant row on the trial plan
    pub fn new(id: String, data: RestaurantCreate) -> Self {
        Self {
            id,
            name: data.name,
            slug: data.slug,
            phone: data.phone,
            email: data.email,
            address: data.address,
            theme: serde_json::Value::Object(Default::default()),
            subscription_status: default_subscription_status(),
            subscription_plan: default_subscription_plan(),
            is_active: true,
        }
    }
}
