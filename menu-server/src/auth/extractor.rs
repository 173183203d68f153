//! Current user context
//!
//! Built by [`require_auth`](super::require_auth) from a re-validated user
//! and injected into request extensions. Handlers take it as an extractor.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::error::{AppError, ErrorCode};
use shared::models::{Role, User};

use super::permissions::role_has_permission;
use crate::core::AppState;
use crate::security_log;

#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub restaurant_id: Option<String>,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            restaurant_id: user.restaurant_id,
        }
    }
}

impl CurrentUser {
    pub fn has_permission(&self, permission: &str) -> bool {
        role_has_permission(self.role, permission)
    }

    /// Restaurant this user works for (dashboards are tenant-scoped)
    pub fn restaurant_id(&self) -> Result<&str, AppError> {
        self.restaurant_id
            .as_deref()
            .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotSelected))
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let token = super::middleware::bearer_token(&parts.headers)?;
        match state.auth.resolve(token).await {
            Ok(user) => {
                let user = CurrentUser::from(user);
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            Err(e) => {
                security_log!(
                    "WARN",
                    "auth_failed",
                    error = format!("{}", e),
                    uri = format!("{:?}", parts.uri)
                );
                Err(e.into())
            }
        }
    }
}
