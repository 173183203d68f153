//! Authentication handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use shared::models::{Role, SignUp, User};
use validator::Validate;

use crate::api::{ApiResponse, AppResult, ValidJson};
use crate::auth::permissions::permissions_for;
use crate::auth::{AuthSession, CurrentUser};
use crate::core::AppState;
use crate::security_log;
use crate::utils::AppError;

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    pub role: Role,
    pub restaurant_id: Option<String>,
}

impl From<SignUpRequest> for SignUp {
    fn from(req: SignUpRequest) -> Self {
        SignUp {
            email: req.email,
            password: req.password,
            full_name: req.full_name,
            role: req.role,
            restaurant_id: req.restaurant_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub restaurant_id: Option<String>,
    pub permissions: Vec<&'static str>,
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> AppResult<ApiResponse<AuthSession>> {
    let session = state.auth.sign_in(&req.email, &req.password).await?;
    Ok(ApiResponse::success(session))
}

/// Staff account creation by a manager.
///
/// The account joins the caller's restaurant; only a platform administrator
/// may name another one. Owners of new restaurants go through
/// `/api/restaurants/register` instead, and `super_admin` is never created here.
pub async fn sign_up(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidJson(req): ValidJson<SignUpRequest>,
) -> AppResult<ApiResponse<User>> {
    if req.role == Role::SuperAdmin {
        security_log!("WARN", "sign_up_rejected", actor = user.id.clone(), role = req.role.as_str());
        return Err(AppError::permission_denied("Cannot create super_admin accounts"));
    }

    let restaurant_id = if user.role == Role::SuperAdmin {
        req.restaurant_id.clone()
    } else {
        let own = user.restaurant_id()?;
        if let Some(requested) = req.restaurant_id.as_deref()
            && requested != own
        {
            security_log!(
                "WARN",
                "sign_up_rejected",
                actor = user.id.clone(),
                restaurant_id = requested.to_string()
            );
            return Err(AppError::permission_denied("Cannot add staff to another restaurant"));
        }
        Some(own.to_string())
    };

    let mut data = SignUp::from(req);
    data.restaurant_id = restaurant_id;
    let session = state.auth.sign_up(data).await?;
    security_log!(
        "INFO",
        "staff_created",
        actor = user.id.clone(),
        user_id = session.user.id.clone()
    );
    Ok(ApiResponse::success(session.user))
}

/// Tokens are stateless; the client drops its copy
pub async fn sign_out(user: CurrentUser) -> AppResult<ApiResponse<()>> {
    security_log!("INFO", "logout", user_id = user.id.clone());
    Ok(ApiResponse::ok())
}

pub async fn me(user: CurrentUser) -> AppResult<ApiResponse<MeResponse>> {
    Ok(ApiResponse::success(MeResponse {
        permissions: permissions_for(user.role).to_vec(),
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        role: user.role,
        restaurant_id: user.restaurant_id,
    }))
}
