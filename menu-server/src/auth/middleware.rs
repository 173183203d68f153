//! Authentication middleware
//!
//! `require_auth` resolves `Authorization: Bearer <token>` against the store
//! (so deactivated users lose access immediately) and injects
//! [`CurrentUser`]. `require_permission` gates a router on one permission.
//!
//! Public paths: non-`/api/` routes, sign-in, restaurant registration, and
//! the customer menu flow under `/api/menu/`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::HeaderMap;
use shared::error::AppError;

use super::extractor::CurrentUser;
use super::jwt::JwtService;
use crate::core::AppState;
use crate::security_log;

const PUBLIC_API_ROUTES: &[&str] = &[
    "/api/auth/sign-in",
    "/api/restaurants/register",
];

fn is_public(path: &str) -> bool {
    !path.starts_with("/api/") || PUBLIC_API_ROUTES.contains(&path) || path.starts_with("/api/menu/")
}

pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(AppError::not_authenticated)?;
    JwtService::extract_from_header(header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS || is_public(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let token = match bearer_token(req.headers()) {
        Ok(token) => token.to_string(),
        Err(e) => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(e);
        }
    };

    match state.auth.resolve(&token).await {
        Ok(user) => {
            req.extensions_mut().insert(CurrentUser::from(user));
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );
            Err(e.into())
        }
    }
}

/// Permission gate
///
/// ```ignore
/// Router::new()
///     .route("/", get(handler::list))
///     .layer(middleware::from_fn(require_permission("orders_view")));
/// ```
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or_else(AppError::not_authenticated)?;

            if !user.has_permission(permission) {
                security_log!(
                    "WARN",
                    "permission_denied",
                    user_id = user.id.clone(),
                    role = user.role.as_str(),
                    required_permission = permission
                );
                return Err(AppError::permission_denied(format!(
                    "Permission denied: {}",
                    permission
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        assert!(is_public("/health"));
        assert!(is_public("/api/auth/sign-in"));
        assert!(is_public("/api/menu/sessions"));
        assert!(is_public("/api/restaurants/register"));
        assert!(!is_public("/api/orders"));
        assert!(!is_public("/api/auth/me"));
        assert!(!is_public("/api/restaurants/tables"));
        assert!(!is_public("/api/auth/sign-up"));
    }
}
