//! Menu Server - multi-tenant QR menu ordering
//!
//! # Overview
//!
//! - **Gateway** (`gateway`): the hosted relational store behind one trait,
//!   with a REST and an in-memory implementation
//! - **Auth** (`auth`): Argon2 credentials, JWT sessions, role permissions
//! - **Menu** (`menu`): QR-triggered catalog loading, per-customer sessions
//!   and carts
//! - **Orders** (`orders`): checkout and the dashboard status board
//! - **Restaurants** (`restaurants`): tenant onboarding and QR links
//! - **HTTP API** (`api`): axum routes over all of the above
//!
//! # Layout
//!
//! ```text
//! menu-server/src/
//! ├── core/          # config, state, server
//! ├── gateway/       # data store access
//! ├── auth/          # JWT, permissions, auth state
//! ├── menu/          # catalog + sessions
//! ├── orders/        # checkout + order board
//! ├── restaurants/   # onboarding
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod gateway;
pub mod menu;
pub mod orders;
pub mod restaurants;
pub mod utils;

pub use auth::{AuthService, AuthState, CurrentUser, JwtService};
pub use core::{AppState, Config, Server};
pub use gateway::{DataGateway, MemoryGateway, RestGateway};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - auth events under the `security` target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
