//! Authentication service
//!
//! Stateless over the gateway and the token codec. Sign-in matches the email
//! case-insensitively (it is stored folded) and only against active users;
//! passwords are verified against Argon2 hashes.
//!
//! Sign-up does not know who is asking: callers decide whether the request is
//! allowed. It only guarantees that restaurant-bound roles land in an active
//! restaurant.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{Role, SignUp, User};
use shared::util::{normalize_email, now_millis};
use thiserror::Error;

use super::jwt::{JwtError, JwtService};
use super::password::{hash_password, verify_password};
use crate::gateway::{DataGateway, GatewayError, Query, Table};
use crate::security_log;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_password, validate_required_text,
};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Insert failed; carries the store's message
    #[error("{0}")]
    Registration(String),

    #[error(transparent)]
    Validation(AppError),

    /// Target restaurant is missing or deactivated
    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    TokenInvalid,

    /// Token is valid but its user is gone or deactivated
    #[error("Account not found or disabled")]
    AccountUnavailable,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("{0}")]
    Internal(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::ExpiredToken => AuthError::TokenExpired,
            JwtError::GenerationFailed(msg) => AuthError::Internal(msg),
            _ => AuthError::TokenInvalid,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::invalid_credentials(),
            AuthError::Registration(msg) => AppError::with_message(ErrorCode::RegistrationFailed, msg),
            AuthError::Validation(e) => e,
            AuthError::RestaurantNotFound(id) => {
                AppError::new(ErrorCode::RestaurantNotFound).with_detail("restaurant_id", id)
            }
            AuthError::TokenExpired => AppError::token_expired(),
            AuthError::TokenInvalid => AppError::invalid_token("Invalid token"),
            AuthError::AccountUnavailable => AppError::new(ErrorCode::AccountDisabled),
            AuthError::Gateway(e) => e.into(),
            AuthError::Internal(msg) => AppError::internal(msg),
        }
    }
}

/// Stored user row (the hash never leaves this module)
#[derive(Debug, Clone, Deserialize)]
struct UserRecord {
    id: String,
    email: String,
    full_name: String,
    role: Role,
    restaurant_id: Option<String>,
    is_active: bool,
    #[serde(default)]
    password_hash: String,
}

impl UserRecord {
    fn into_user(self) -> User {
        User {
            id: self.id,
            email: self.email,
            full_name: self.full_name,
            role: self.role,
            restaurant_id: self.restaurant_id,
            is_active: self.is_active,
        }
    }
}

/// Row written on sign-up
#[derive(Debug, Clone, Serialize)]
pub struct NewUserRow {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub restaurant_id: Option<String>,
    pub is_active: bool,
    pub password_hash: String,
    pub created_at: i64,
}

impl NewUserRow {
    /// Build a row with a freshly hashed password
    pub fn new(data: &SignUp) -> Result<Self, AuthError> {
        let password_hash =
            hash_password(&data.password).map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(Self {
            email: normalize_email(&data.email),
            full_name: data.full_name.trim().to_string(),
            role: data.role,
            restaurant_id: data.restaurant_id.clone(),
            is_active: true,
            password_hash,
            created_at: now_millis(),
        })
    }
}

/// A signed-in user and their session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub expires_in: i64,
    pub user: User,
}

#[derive(Clone)]
pub struct AuthService {
    gateway: Arc<dyn DataGateway>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(gateway: Arc<dyn DataGateway>, jwt: Arc<JwtService>) -> Self {
        Self { gateway, jwt }
    }

    fn issue(&self, user: User) -> Result<AuthSession, AuthError> {
        let token = self.jwt.generate_token(&user)?;
        Ok(AuthSession {
            token,
            expires_in: self.jwt.expires_in(),
            user,
        })
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        validate_required_text(email, "email", crate::utils::validation::MAX_EMAIL_LEN)
            .map_err(AuthError::Validation)?;
        validate_required_text(password, "password", crate::utils::validation::MAX_PASSWORD_LEN)
            .map_err(AuthError::Validation)?;

        let email = normalize_email(email);
        let query = Query::from(Table::Users)
            .eq("email", email.as_str())
            .eq("is_active", true)
            .limit(1);
        let record: Option<UserRecord> = self.gateway.maybe_single(&query).await?;

        let Some(record) = record else {
            security_log!("WARN", "login_failed", email = email.clone(), reason = "unknown_or_inactive");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &record.password_hash) {
            security_log!("WARN", "login_failed", email = email.clone(), reason = "invalid_password");
            return Err(AuthError::InvalidCredentials);
        }

        let user = record.into_user();
        security_log!("INFO", "login_success", user_id = user.id.clone(), role = user.role.as_str());
        self.issue(user)
    }

    pub async fn sign_up(&self, data: SignUp) -> Result<AuthSession, AuthError> {
        validate_email(&data.email).map_err(AuthError::Validation)?;
        validate_password(&data.password).map_err(AuthError::Validation)?;
        validate_required_text(&data.full_name, "full_name", MAX_NAME_LEN)
            .map_err(AuthError::Validation)?;
        if data.role.requires_restaurant() {
            let restaurant_id = data.restaurant_id.as_deref().unwrap_or_default();
            validate_required_text(restaurant_id, "restaurant_id", MAX_SHORT_TEXT_LEN)
                .map_err(AuthError::Validation)?;
            self.ensure_restaurant(restaurant_id).await?;
        }

        let row = NewUserRow::new(&data)?;
        let record: UserRecord = self
            .gateway
            .insert_as(Table::Users, &row)
            .await
            .map_err(|e| {
                tracing::warn!(email = %row.email, error = %e, "Sign-up insert failed");
                AuthError::Registration(e.user_message())
            })?;

        let user = record.into_user();
        security_log!("INFO", "user_registered", user_id = user.id.clone(), role = user.role.as_str());
        self.issue(user)
    }

    async fn ensure_restaurant(&self, restaurant_id: &str) -> Result<(), AuthError> {
        let query = Query::from(Table::Restaurants)
            .eq("id", restaurant_id)
            .eq("is_active", true)
            .limit(1);
        if self.gateway.select(&query).await?.is_empty() {
            security_log!("WARN", "sign_up_rejected", restaurant_id = restaurant_id.to_string(), reason = "unknown_restaurant");
            return Err(AuthError::RestaurantNotFound(restaurant_id.to_string()));
        }
        Ok(())
    }

    /// Token → active user
    pub async fn resolve(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.jwt.validate_token(token)?;
        let query = Query::from(Table::Users)
            .eq("id", claims.sub.as_str())
            .eq("is_active", true)
            .limit(1);
        let record: Option<UserRecord> = self.gateway.maybe_single(&query).await?;
        record
            .map(UserRecord::into_user)
            .ok_or(AuthError::AccountUnavailable)
    }
}
