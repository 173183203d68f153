//! Restaurant handlers

use axum::extract::State;
use serde::Deserialize;
use validator::Validate;

use crate::api::{ApiResponse, AppResult, ValidJson};
use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::restaurants::{RegisterRestaurant, Registration, TableLink};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRestaurantRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 100))]
    pub phone: Option<String>,
    #[validate(length(max = 254))]
    pub email: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub admin_full_name: String,
    #[validate(email, length(max = 254))]
    pub admin_email: String,
    #[validate(length(min = 6, max = 128))]
    pub admin_password: String,
}

impl From<RegisterRestaurantRequest> for RegisterRestaurant {
    fn from(req: RegisterRestaurantRequest) -> Self {
        RegisterRestaurant {
            name: req.name,
            phone: req.phone,
            email: req.email,
            address: req.address,
            admin_full_name: req.admin_full_name,
            admin_email: req.admin_email,
            admin_password: req.admin_password,
        }
    }
}

pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRestaurantRequest>,
) -> AppResult<ApiResponse<Registration>> {
    let registration = state.restaurants.register(req.into()).await?;
    Ok(ApiResponse::success(registration))
}

pub async fn table_links(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<Vec<TableLink>>> {
    let links = state.restaurants.table_links(user.restaurant_id()?).await?;
    Ok(ApiResponse::success(links))
}
